//! Tests for ZoneActivation.

#[cfg(test)]
mod tests {
    use crate::spawner::{ZoneActivation, ZoneConfig, ZoneState, ZoneTransition};

    fn config() -> ZoneConfig {
        ZoneConfig {
            activation_distance: 20.0,
            deactivation_distance: 25.0,
            zone_reset_time: 30.0,
            ..Default::default()
        }
    }

    fn active_zone(config: &ZoneConfig) -> ZoneActivation {
        let mut zone = ZoneActivation::new();
        assert_eq!(zone.evaluate(10.0, 0.0, config), ZoneTransition::Activated);
        zone
    }

    #[test]
    fn test_starts_dormant() {
        let zone = ZoneActivation::new();
        assert_eq!(zone.state(), ZoneState::Dormant);
        assert!(!zone.allows_respawn());
    }

    #[test]
    fn test_dormant_ignores_far_player() {
        let config = config();
        let mut zone = ZoneActivation::new();

        assert_eq!(zone.evaluate(20.5, 0.0, &config), ZoneTransition::None);
        assert_eq!(zone.evaluate(100.0, 60.0, &config), ZoneTransition::None);
        assert_eq!(zone.state(), ZoneState::Dormant);
    }

    #[test]
    fn test_activation_at_exact_radius() {
        let config = config();
        let mut zone = ZoneActivation::new();

        assert_eq!(zone.evaluate(20.0, 0.0, &config), ZoneTransition::Activated);
        assert_eq!(zone.state(), ZoneState::Active);
    }

    #[test]
    fn test_oscillation_inside_band_never_resets() {
        let config = config();
        let mut zone = active_zone(&config);

        // Игрок топчется на 22 (между 20 и 25) две минуты
        let mut now = 0.0;
        while now < 120.0 {
            now += 0.5;
            let distance = if (now as i32) % 2 == 0 { 22.0 } else { 21.5 };
            zone.evaluate(distance, now, &config);
            assert_ne!(zone.state(), ZoneState::PendingReset);
        }
        assert!(zone.player_absent_since().is_none());
    }

    #[test]
    fn test_absence_arms_reset_after_reset_time() {
        let config = config();
        let mut zone = active_zone(&config);

        assert_eq!(zone.evaluate(30.0, 10.0, &config), ZoneTransition::AbsenceStarted);
        assert_eq!(zone.player_absent_since(), Some(10.0));

        assert_eq!(zone.evaluate(30.0, 39.0, &config), ZoneTransition::None);
        assert_eq!(zone.state(), ZoneState::Active);

        assert_eq!(zone.evaluate(30.0, 40.0, &config), ZoneTransition::ResetArmed);
        assert_eq!(zone.state(), ZoneState::PendingReset);
        assert!(!zone.allows_respawn());
    }

    #[test]
    fn test_return_before_reset_time_clears_timer() {
        let config = config();
        let mut zone = active_zone(&config);

        zone.evaluate(30.0, 0.0, &config);
        assert_eq!(zone.evaluate(10.0, 29.0, &config), ZoneTransition::AbsenceCleared);
        assert_eq!(zone.state(), ZoneState::Active);
        assert!(zone.player_absent_since().is_none());

        // Новое отсутствие считается заново
        zone.evaluate(30.0, 31.0, &config);
        assert_eq!(zone.evaluate(30.0, 60.0, &config), ZoneTransition::None);
        assert_eq!(zone.evaluate(30.0, 61.0, &config), ZoneTransition::ResetArmed);
    }

    #[test]
    fn test_pending_reset_reactivates_on_entry() {
        let config = config();
        let mut zone = active_zone(&config);
        zone.evaluate(30.0, 0.0, &config);
        zone.evaluate(30.0, 30.0, &config);
        assert_eq!(zone.state(), ZoneState::PendingReset);

        // Полоса гистерезиса — ещё не re-entry
        assert_eq!(zone.evaluate(22.0, 40.0, &config), ZoneTransition::None);
        assert_eq!(zone.state(), ZoneState::PendingReset);

        assert_eq!(zone.evaluate(10.0, 50.0, &config), ZoneTransition::Reactivated);
        assert_eq!(zone.state(), ZoneState::Active);
        assert!(zone.player_absent_since().is_none());
    }

    #[test]
    fn test_band_keeps_running_timer() {
        let config = config();
        let mut zone = active_zone(&config);

        zone.evaluate(30.0, 0.0, &config);
        // В полосе гистерезиса таймер не сбрасывается
        zone.evaluate(22.0, 15.0, &config);
        assert_eq!(zone.player_absent_since(), Some(0.0));
        assert_eq!(zone.evaluate(30.0, 30.0, &config), ZoneTransition::ResetArmed);
    }

    #[test]
    fn test_reset_disabled_never_leaves_active() {
        let config = ZoneConfig {
            enable_zone_reset: false,
            ..config()
        };
        let mut zone = active_zone(&config);

        for step in 0..200 {
            zone.evaluate(100.0, step as f32, &config);
        }
        assert_eq!(zone.state(), ZoneState::Active);
        assert!(zone.player_absent_since().is_none());
    }

    #[test]
    fn test_zero_reset_time_arms_immediately() {
        let config = ZoneConfig {
            zone_reset_time: 0.0,
            ..config()
        };
        let mut zone = active_zone(&config);

        assert_eq!(zone.evaluate(30.0, 1.0, &config), ZoneTransition::ResetArmed);
    }

    #[test]
    fn test_force_active() {
        let mut zone = ZoneActivation::new();
        zone.force_active();
        assert_eq!(zone.state(), ZoneState::Active);
        assert!(zone.allows_respawn());
    }
}
