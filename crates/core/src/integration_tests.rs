//! Integration tests: exercise the full flow against a simulated panel.
//!
//! These tests script a mock XK-24 through plug/unplug cycles and drive the
//! poll controller the way the timer loop does, checking the state
//! transitions and the frames that reach the device.

#[cfg(test)]
mod tests {
    use crate::backlight::{BacklightCommand, Color};
    use crate::poller::{PanelStatus, Poller, MAX_CONSECUTIVE_READ_FAILURES};
    use crate::report::KEY_REPORT_LEN;
    use crate::scene::{self, Scene};
    use crate::transport::mock::{MockPanel, MockProvider};

    fn key_report(data: [u8; 4]) -> [u8; KEY_REPORT_LEN] {
        let mut report = [0u8; KEY_REPORT_LEN];
        report[3..7].copy_from_slice(&data);
        report
    }

    /// Device absent at startup: the retry tick fails repeatedly, then the
    /// panel appears and the next tick connects.
    #[test]
    fn connects_on_late_arrival() {
        let provider = MockProvider::new();
        let mut poller = Poller::new(provider.clone());

        for _ in 0..3 {
            assert!(!poller.try_open());
            assert_eq!(poller.status(), PanelStatus::Disconnected);
        }
        assert_eq!(provider.open_attempts(), 3);

        let panel = MockPanel::new();
        panel.push_report(&key_report([0b0000_0001, 0, 0, 0]));
        provider.plug_in(panel);

        assert!(poller.try_open());
        assert_eq!(poller.status(), PanelStatus::Connected);

        let keys = poller.poll_keys().expect("first read after connect");
        assert_eq!(keys.pressed_keys().collect::<Vec<_>>(), vec![0]);
    }

    /// A press shows up, then the panel idles: idle reads report the neutral
    /// state rather than blocking or erroring.
    #[test]
    fn press_then_idle() {
        let provider = MockProvider::new();
        let panel = MockPanel::new();
        panel.push_report(&key_report([0, 0b0010_0000, 0, 0]));
        provider.plug_in(panel);

        let mut poller = Poller::new(provider);
        poller.try_open();

        let keys = poller.poll_keys().unwrap();
        assert_eq!(keys.pressed_keys().collect::<Vec<_>>(), vec![11]);

        for _ in 0..10 {
            let keys = poller.poll_keys().unwrap();
            assert!(!keys.any_pressed());
        }
    }

    /// Unplugging mid-session: reads start failing, the controller rides out
    /// the first failures, then drops the handle and resumes retrying. A
    /// replug reconnects.
    #[test]
    fn unplug_and_replug_cycle() {
        let provider = MockProvider::new();
        let panel = MockPanel::new();
        panel.push_report(&key_report([0, 0, 0, 0]));
        for _ in 0..MAX_CONSECUTIVE_READ_FAILURES {
            panel.push_read_error("no such device");
        }
        provider.plug_in(panel);

        let mut poller = Poller::new(provider.clone());
        poller.try_open();
        assert!(poller.poll_keys().is_some());

        provider.unplug();
        for _ in 0..MAX_CONSECUTIVE_READ_FAILURES {
            assert_eq!(poller.poll_keys(), None);
        }
        assert_eq!(poller.status(), PanelStatus::Disconnected);

        // Retrying while unplugged keeps failing
        assert!(!poller.try_open());

        let replugged = MockPanel::new();
        provider.plug_in(replugged);
        assert!(poller.try_open());
        assert_eq!(poller.status(), PanelStatus::Connected);
    }

    /// Command path end to end: dropped while absent, delivered once
    /// connected, dropped again after the connection is lost.
    #[test]
    fn backlight_command_lifecycle() {
        let provider = MockProvider::new();
        let mut poller = Poller::new(provider.clone());
        let cmd = BacklightCommand::new(Color::Red, 5);

        assert!(!poller.send_backlight(&cmd));

        let panel = MockPanel::new();
        provider.plug_in(panel.clone());
        poller.try_open();

        assert!(poller.send_backlight(&cmd));
        assert_eq!(&panel.writes()[0][..4], &[0, 181, 5, 1]);

        poller.close();
        assert!(!poller.send_backlight(&cmd));
        assert_eq!(panel.writes().len(), 1);
    }

    /// A whole scene reaches the device through the poll controller's port.
    #[test]
    fn scene_applies_through_open_connection() {
        let provider = MockProvider::new();
        let panel = MockPanel::new();
        provider.plug_in(panel.clone());

        let mut poller = Poller::new(provider);
        poller.try_open();

        let mut scene = Scene::default();
        scene.keys[0] = Color::Blue;
        scene.keys[18] = Color::Red;

        scene::apply_scene(&panel, &scene).unwrap();

        let writes = panel.writes();
        assert_eq!(writes.len(), scene.keys.len());
        assert_eq!(&writes[0][..4], &[0, 181, 32, 1]);
        assert_eq!(&writes[18][..4], &[0, 181, 24, 1]);
    }

    /// Teardown mirrors process exit: close releases the handle and further
    /// closes are no-ops.
    #[test]
    fn teardown_is_clean() {
        let provider = MockProvider::new();
        provider.plug_in(MockPanel::new());

        let mut poller = Poller::new(provider);
        poller.try_open();
        assert!(poller.is_connected());

        poller.close();
        poller.close();
        assert_eq!(poller.status(), PanelStatus::Disconnected);
        assert_eq!(poller.poll_keys(), None);
    }
}
