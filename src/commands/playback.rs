use crate::models::state::DashboardState;

/// Play button: flips the playing flag and reports the new state. Restarting
/// resumes from the current window position.
pub fn toggle_play(state: &mut DashboardState) -> bool {
    state.playback.playing = !state.playback.playing;
    state.playback.playing
}

/// One external timer tick. While playing, the whole window slides forward
/// by `step` date indices, clamped to the axis; once the window's end sits at
/// the maximum the playback stops itself. Returns whether the window moved
/// (callers regenerate the dataset only when it did).
pub fn tick(state: &mut DashboardState) -> bool {
    if !state.playback.playing {
        return false;
    }

    let max = state.max_date_index();
    if state.end_index >= max {
        state.playback.playing = false;
        return false;
    }

    let duration = state.end_index.saturating_sub(state.start_index);
    let step = state.playback.step;
    state.start_index = (state.start_index + step).min(max.saturating_sub(duration));
    state.end_index = (state.end_index + step).min(max);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::DashboardConfig;
    use chrono::NaiveDate;

    fn state_with_days(days: u32) -> DashboardState {
        let mut state = DashboardState::with_config(DashboardConfig::default());
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        state.available_dates = (0..days)
            .map(|day| base + chrono::Duration::days(day as i64))
            .collect();
        state.start_index = 0;
        state.end_index = 4;
        state
    }

    #[test]
    fn tick_does_nothing_while_paused() {
        let mut state = state_with_days(30);
        assert!(!tick(&mut state));
        assert_eq!(state.start_index, 0);
    }

    #[test]
    fn window_slides_by_step_keeping_duration() {
        let mut state = state_with_days(30);
        toggle_play(&mut state);

        assert!(tick(&mut state));
        assert_eq!((state.start_index, state.end_index), (10, 14));
        assert!(tick(&mut state));
        assert_eq!((state.start_index, state.end_index), (20, 24));
    }

    #[test]
    fn window_clamps_at_the_axis_end_then_stops() {
        let mut state = state_with_days(30);
        toggle_play(&mut state);

        for _ in 0..3 {
            tick(&mut state);
        }
        // End clamped to index 29; start keeps the 4-day duration.
        assert_eq!((state.start_index, state.end_index), (25, 29));
        assert!(state.playback.playing);

        // The tick after reaching the end auto-stops without moving.
        assert!(!tick(&mut state));
        assert!(!state.playback.playing);
        assert_eq!((state.start_index, state.end_index), (25, 29));
    }

    #[test]
    fn playback_is_restartable_from_current_position() {
        let mut state = state_with_days(60);
        toggle_play(&mut state);
        tick(&mut state);

        assert!(!toggle_play(&mut state));
        let paused_at = (state.start_index, state.end_index);
        assert!(!tick(&mut state));
        assert_eq!((state.start_index, state.end_index), paused_at);

        assert!(toggle_play(&mut state));
        assert!(tick(&mut state));
        assert_eq!(state.start_index, paused_at.0 + 10);
    }
}
