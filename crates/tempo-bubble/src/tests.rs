#[cfg(test)]
mod tests {
    use glam::Vec3;

    use tempo_core::bubble::{CreateBubbleRequest, TimeBubble};
    use tempo_core::clock::TickClock;
    use tempo_core::components::TimeBubbleMembership;
    use tempo_core::enums::{BubbleMode, RewindMode};
    use tempo_core::types::{BubbleId, BubbleVolume};

    use crate::delta::effective_delta;
    use crate::resolve::{membership_for, resolve};
    use crate::volume::contains;

    fn bubble(id: u32, request: CreateBubbleRequest) -> TimeBubble {
        TimeBubble::from_request(BubbleId(id), &request, 0)
    }

    fn membership(mode: BubbleMode, scale: f32) -> TimeBubbleMembership {
        TimeBubbleMembership {
            bubble_id: BubbleId(1),
            local_mode: mode,
            local_scale: scale,
            member_since_tick: 0,
            previous_frame_flag: false,
            priority: 0,
        }
    }

    // ---- Containment ----

    #[test]
    fn test_sphere_contains() {
        let volume = BubbleVolume::sphere(Vec3::new(10.0, 0.0, 0.0), 5.0);
        assert!(contains(&volume, Vec3::new(10.0, 0.0, 0.0)));
        assert!(contains(&volume, Vec3::new(15.0, 0.0, 0.0)), "boundary is inside");
        assert!(!contains(&volume, Vec3::new(15.1, 0.0, 0.0)));
        assert!(!contains(&volume, Vec3::new(10.0, 4.0, 4.0)));
    }

    #[test]
    fn test_box_contains() {
        let volume = BubbleVolume::aabb(Vec3::ZERO, Vec3::new(2.0, 1.0, 3.0));
        assert!(contains(&volume, Vec3::new(2.0, -1.0, 3.0)));
        assert!(contains(&volume, Vec3::new(-1.9, 0.5, 0.0)));
        assert!(!contains(&volume, Vec3::new(0.0, 1.5, 0.0)));
        assert!(!contains(&volume, Vec3::new(0.0, 0.0, -3.1)));
    }

    #[test]
    fn test_zero_radius_sphere_contains_only_center() {
        let volume = BubbleVolume::sphere(Vec3::ONE, 0.0);
        assert!(contains(&volume, Vec3::ONE));
        assert!(!contains(&volume, Vec3::new(1.0, 1.0, 1.001)));
    }

    // ---- Resolution ----

    #[test]
    fn test_resolve_highest_priority_wins() {
        let low = bubble(
            1,
            CreateBubbleRequest::sphere(Vec3::ZERO, 10.0, BubbleMode::Scale).with_priority(5),
        );
        let high = bubble(
            2,
            CreateBubbleRequest::sphere(Vec3::ZERO, 10.0, BubbleMode::Stasis).with_priority(10),
        );

        let forward = [low, high];
        let reversed = [high, low];
        assert_eq!(resolve(Vec3::ZERO, &forward).unwrap().id, BubbleId(2));
        assert_eq!(resolve(Vec3::ZERO, &reversed).unwrap().id, BubbleId(2));
    }

    #[test]
    fn test_resolve_tie_prefers_lowest_id() {
        let a = bubble(
            7,
            CreateBubbleRequest::sphere(Vec3::ZERO, 10.0, BubbleMode::Pause).with_priority(3),
        );
        let b = bubble(
            4,
            CreateBubbleRequest::sphere(Vec3::ZERO, 10.0, BubbleMode::Scale).with_priority(3),
        );
        assert_eq!(resolve(Vec3::ZERO, &[a, b]).unwrap().id, BubbleId(4));
        assert_eq!(resolve(Vec3::ZERO, &[b, a]).unwrap().id, BubbleId(4));
    }

    #[test]
    fn test_resolve_skips_inactive_and_distant() {
        let mut inactive = bubble(
            1,
            CreateBubbleRequest::sphere(Vec3::ZERO, 10.0, BubbleMode::Pause).with_priority(9),
        );
        inactive.is_active = false;
        let far = bubble(
            2,
            CreateBubbleRequest::sphere(Vec3::splat(100.0), 1.0, BubbleMode::Pause),
        );
        assert!(resolve(Vec3::ZERO, &[inactive, far]).is_none());
    }

    #[test]
    fn test_membership_keeps_entry_tick_in_same_bubble() {
        let b = bubble(
            3,
            CreateBubbleRequest::sphere(Vec3::ZERO, 1.0, BubbleMode::Scale).with_scale(0.5),
        );
        let first = membership_for(&b, None, 10);
        assert_eq!(first.member_since_tick, 10);
        assert!(!first.previous_frame_flag);
        assert_eq!(first.local_scale, 0.5);

        let second = membership_for(&b, Some(&first), 11);
        assert_eq!(second.member_since_tick, 10);
        assert!(second.previous_frame_flag);
    }

    #[test]
    fn test_membership_resets_entry_tick_on_bubble_change() {
        let a = bubble(1, CreateBubbleRequest::sphere(Vec3::ZERO, 1.0, BubbleMode::Scale));
        let b = bubble(2, CreateBubbleRequest::sphere(Vec3::ZERO, 1.0, BubbleMode::Pause));
        let first = membership_for(&a, None, 5);
        let moved = membership_for(&b, Some(&first), 8);
        assert_eq!(moved.bubble_id, BubbleId(2));
        assert_eq!(moved.member_since_tick, 8);
        assert!(moved.previous_frame_flag);
    }

    // ---- Effective delta ----

    fn view() -> tempo_core::clock::TimeView {
        let mut clock = TickClock::new(0.1, 2.0);
        clock.delta = clock.scaled_delta();
        clock.view(RewindMode::Record)
    }

    #[test]
    fn test_delta_without_membership_follows_clock() {
        let v = view();
        assert!((effective_delta(&v, None, false) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_delta_frozen_modes() {
        let v = view();
        assert_eq!(effective_delta(&v, Some(&membership(BubbleMode::Pause, 1.0)), false), 0.0);
        assert_eq!(effective_delta(&v, Some(&membership(BubbleMode::Stasis, 1.0)), false), 0.0);
        assert_eq!(effective_delta(&v, None, true), 0.0);
    }

    #[test]
    fn test_delta_scale_uses_fixed_delta() {
        let v = view();
        let d = effective_delta(&v, Some(&membership(BubbleMode::Scale, 0.25)), false);
        assert!((d - 0.025).abs() < 1e-6);
    }

    #[test]
    fn test_delta_rewind_is_negative() {
        let v = view();
        let d = effective_delta(&v, Some(&membership(BubbleMode::Rewind, 1.0)), false);
        assert!((d + 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_delta_bubble_halts_with_global_pause() {
        let mut clock = TickClock::new(0.1, 1.0);
        clock.is_paused = true;
        clock.delta = 0.0;
        let v = clock.view(RewindMode::Record);
        assert_eq!(effective_delta(&v, None, false), 0.0);
        for mode in [BubbleMode::Scale, BubbleMode::Rewind] {
            assert_eq!(effective_delta(&v, Some(&membership(mode, 0.5)), false), 0.0);
        }
    }

    #[test]
    fn test_delta_bubble_ignores_global_speed() {
        let v = view();
        let d = effective_delta(&v, Some(&membership(BubbleMode::Scale, 1.0)), false);
        assert!((d - 0.1).abs() < 1e-6, "scale members use fixed_delta, not the sped-up delta");
    }
}
