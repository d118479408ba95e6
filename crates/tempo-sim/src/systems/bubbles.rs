//! Time bubble manager.
//!
//! Owns the bubble registry and the pending create/remove requests. Each
//! tick it materializes requests, expires finished bubbles, then recomputes
//! every affectable entity's membership from scratch. Membership and stasis
//! markers are written through a deferred command buffer, so the manager is
//! their only writer.

use glam::Vec3;
use hecs::{CommandBuffer, Entity, World};
use rayon::prelude::*;
use tracing::{debug, trace};

use tempo_bubble::resolve::{membership_for, resolve};
use tempo_core::bubble::{CreateBubbleRequest, RemoveBubbleRequest, TimeBubble};
use tempo_core::components::{InStasis, TimeAffectable, TimeBubbleMembership};
use tempo_core::enums::BubbleMode;
use tempo_core::types::{BubbleId, Transform};

/// Input row for one affectable entity.
struct Candidate {
    entity: Entity,
    position: Vec3,
    previous: Option<TimeBubbleMembership>,
    in_stasis: bool,
}

/// Resolved row, applied after all containment tests finish.
struct Resolution {
    entity: Entity,
    membership: Option<TimeBubbleMembership>,
    had_membership: bool,
    in_stasis: bool,
}

/// Registry of live bubbles plus the requests waiting for the next pass.
#[derive(Debug, Clone)]
pub struct BubbleManager {
    /// Live bubbles in ascending id order.
    bubbles: Vec<TimeBubble>,
    pending_create: Vec<(BubbleId, CreateBubbleRequest)>,
    pending_remove: Vec<RemoveBubbleRequest>,
    next_id: u32,
    parallel_threshold: usize,
    member_count: usize,
}

impl BubbleManager {
    pub fn new(parallel_threshold: usize) -> Self {
        Self {
            bubbles: Vec::new(),
            pending_create: Vec::new(),
            pending_remove: Vec::new(),
            next_id: 1,
            parallel_threshold,
            member_count: 0,
        }
    }

    /// Queue a bubble for creation. The id is final immediately; the bubble
    /// takes effect on the next pass.
    pub fn create_bubble(&mut self, request: CreateBubbleRequest) -> BubbleId {
        let id = BubbleId(self.next_id);
        self.next_id += 1;
        self.pending_create.push((id, request));
        id
    }

    /// Queue a bubble for removal on the next pass.
    pub fn remove_bubble(&mut self, bubble_id: BubbleId) {
        self.pending_remove.push(RemoveBubbleRequest { bubble_id });
    }

    pub fn bubbles(&self) -> &[TimeBubble] {
        &self.bubbles
    }

    pub fn get(&self, id: BubbleId) -> Option<&TimeBubble> {
        self.bubbles.iter().find(|bubble| bubble.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.bubbles.iter().filter(|bubble| bubble.is_active).count()
    }

    /// Entities holding a membership after the last pass.
    pub fn member_count(&self) -> usize {
        self.member_count
    }

    /// One bubble pass for `tick`.
    pub fn run(&mut self, world: &mut World, tick: u64) {
        let mut retired = self.apply_requests(tick);
        self.follow_sources(world);
        retired.extend(self.expire(tick));
        if !retired.is_empty() {
            strip_memberships(world, &retired);
        }
        self.recompute_memberships(world, tick);
    }

    /// Materialize pending requests. Returns ids removed by request.
    fn apply_requests(&mut self, tick: u64) -> Vec<BubbleId> {
        for (id, request) in self.pending_create.drain(..) {
            debug!(%id, mode = ?request.mode, priority = request.priority, "bubble created");
            self.bubbles.push(TimeBubble::from_request(id, &request, tick));
        }

        let mut removed = Vec::new();
        for request in self.pending_remove.drain(..) {
            let before = self.bubbles.len();
            self.bubbles.retain(|bubble| bubble.id != request.bubble_id);
            if self.bubbles.len() < before {
                debug!(id = %request.bubble_id, "bubble removed");
                removed.push(request.bubble_id);
            } else {
                debug!(id = %request.bubble_id, "remove request for unknown bubble");
            }
        }
        removed
    }

    /// Re-center bubbles on their source entity, when it has a transform.
    fn follow_sources(&mut self, world: &World) {
        for bubble in &mut self.bubbles {
            let Some(source) = bubble.source_entity else {
                continue;
            };
            if let Ok(transform) = world.get::<&Transform>(source) {
                bubble.volume.recenter(transform.position);
            }
        }
    }

    /// Drop finite bubbles whose lifetime has elapsed.
    fn expire(&mut self, tick: u64) -> Vec<BubbleId> {
        let expired: Vec<BubbleId> = self
            .bubbles
            .iter()
            .filter(|bubble| bubble.is_expired(tick))
            .map(|bubble| bubble.id)
            .collect();
        if !expired.is_empty() {
            self.bubbles.retain(|bubble| !bubble.is_expired(tick));
            debug!(count = expired.len(), tick, "bubbles expired");
        }
        expired
    }

    fn recompute_memberships(&mut self, world: &mut World, tick: u64) {
        let candidates: Vec<Candidate> = world
            .query::<(
                &TimeAffectable,
                &Transform,
                Option<&TimeBubbleMembership>,
                Option<&InStasis>,
            )>()
            .iter()
            .map(|(entity, (_, transform, membership, stasis))| Candidate {
                entity,
                position: transform.position,
                previous: membership.copied(),
                in_stasis: stasis.is_some(),
            })
            .collect();

        let bubbles = &self.bubbles;
        let resolve_one = |candidate: &Candidate| Resolution {
            entity: candidate.entity,
            membership: resolve(candidate.position, bubbles)
                .map(|bubble| membership_for(bubble, candidate.previous.as_ref(), tick)),
            had_membership: candidate.previous.is_some(),
            in_stasis: candidate.in_stasis,
        };

        // Sharded across the rayon pool for large populations. All results
        // are collected before any write, so the tick stays barrier-synchronized.
        let resolutions: Vec<Resolution> = if candidates.len() >= self.parallel_threshold {
            candidates.par_iter().map(resolve_one).collect()
        } else {
            candidates.iter().map(resolve_one).collect()
        };

        let mut cmd = CommandBuffer::new();
        let mut members = 0;
        for resolution in &resolutions {
            let wants_stasis = resolution
                .membership
                .is_some_and(|m| m.local_mode == BubbleMode::Stasis);
            match resolution.membership {
                Some(membership) => {
                    members += 1;
                    cmd.insert_one(resolution.entity, membership);
                }
                None if resolution.had_membership => {
                    cmd.remove_one::<TimeBubbleMembership>(resolution.entity);
                }
                None => {}
            }
            if wants_stasis && !resolution.in_stasis {
                cmd.insert_one(resolution.entity, InStasis);
            } else if !wants_stasis && resolution.in_stasis {
                cmd.remove_one::<InStasis>(resolution.entity);
            }
        }

        // Entities that stopped being affectable lose their derived markers.
        for (entity, (_, affectable, transform, stasis)) in world
            .query::<(
                &TimeBubbleMembership,
                Option<&TimeAffectable>,
                Option<&Transform>,
                Option<&InStasis>,
            )>()
            .iter()
        {
            if affectable.is_none() || transform.is_none() {
                cmd.remove_one::<TimeBubbleMembership>(entity);
                if stasis.is_some() {
                    cmd.remove_one::<InStasis>(entity);
                }
            }
        }

        cmd.run_on(world);
        self.member_count = members;
        trace!(
            tick,
            candidates = resolutions.len(),
            members,
            "bubble memberships resolved"
        );
    }
}

/// Remove membership (and stasis) from entities that referenced a retired bubble.
fn strip_memberships(world: &mut World, retired: &[BubbleId]) {
    let mut cmd = CommandBuffer::new();
    for (entity, (membership, stasis)) in world
        .query::<(&TimeBubbleMembership, Option<&InStasis>)>()
        .iter()
    {
        if retired.contains(&membership.bubble_id) {
            cmd.remove_one::<TimeBubbleMembership>(entity);
            if stasis.is_some() {
                cmd.remove_one::<InStasis>(entity);
            }
        }
    }
    cmd.run_on(world);
}
