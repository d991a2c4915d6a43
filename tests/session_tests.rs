mod common;

use common::{assert_close, viewport, Event, RecordingBackend};
use glam::Vec3;
use scene_sync::core::DisplayContext;
use scene_sync::frame::FrameIterator;
use scene_sync::geometry::GeometryKind;
use scene_sync::light::LightRig;
use scene_sync::material::MaterialKind;
use scene_sync::math::Color;
use scene_sync::scenes::preset_by_name;
use scene_sync::{
    ConfigChange, SceneConfig, SceneError, Session, SessionStats, SyncOutcome, TickOutcome,
};

fn start(config: SceneConfig) -> (Session<RecordingBackend>, scene_sync::LoopHandle) {
    Session::new(config, LightRig::default(), viewport(), RecordingBackend::new()).unwrap()
}

#[cfg(test)]
mod session_tests {
    use super::*;

    #[test]
    fn test_new_sizes_backend_and_builds() {
        let (session, handle) = start(SceneConfig::default());

        let events = &session.backend().events;
        assert_eq!(events[0], Event::Resize(viewport()));
        assert_eq!(session.backend().creates(), 2);
        assert!(session.state().object.is_some());
        assert!(handle.is_running());
    }

    #[test]
    fn test_paused_config_starts_idle() {
        let config = SceneConfig {
            paused: true,
            ..SceneConfig::default()
        };
        let (mut session, handle) = start(config);
        let mut frames = FrameIterator::fixed_step(0.1);

        assert!(!handle.is_running());
        assert_eq!(session.tick(&frames.advance()).unwrap(), TickOutcome::Idle);
        assert_eq!(session.backend().renders(), 0);
    }

    #[test]
    fn test_failed_first_build_is_reported() {
        let mut backend = RecordingBackend::new();
        backend.fail_materials = true;
        let result = Session::new(SceneConfig::default(), LightRig::default(), viewport(), backend);
        assert!(result.is_err());
    }

    #[test]
    fn test_paused_change_stops_and_restarts_loop() {
        let (mut session, handle) = start(SceneConfig::default());
        let mut frames = FrameIterator::fixed_step(0.1);

        session.tick(&frames.advance()).unwrap();
        let outcome = session.apply(ConfigChange::Paused(true)).unwrap();
        assert_eq!(outcome, SyncOutcome::Deferred);
        assert!(!handle.is_running());
        assert_eq!(session.tick(&frames.advance()).unwrap(), TickOutcome::Idle);

        session.apply(ConfigChange::Paused(false)).unwrap();
        assert_eq!(session.tick(&frames.advance()).unwrap(), TickOutcome::Rendered);
        assert_close(session.state().rotation().unwrap(), Vec3::new(0.02, 0.02, 0.0));
    }

    #[test]
    fn test_external_pause_shows_in_config() {
        let (mut session, handle) = start(SceneConfig::default());
        let mut frames = FrameIterator::fixed_step(0.1);
        let remote = handle.clone();

        assert!(remote.pause());
        assert_eq!(session.tick(&frames.advance()).unwrap(), TickOutcome::Idle);
        assert!(session.config().paused);

        let target = SceneConfig::default();
        let report = session.sync_to(&target).unwrap();
        assert_eq!(report.changes, vec![ConfigChange::Paused(false)]);
        assert!(handle.is_running());
        assert!(!session.config().paused);

        assert!(remote.pause());
        assert!(remote.resume());
        assert_eq!(session.tick(&frames.advance()).unwrap(), TickOutcome::Rendered);
        assert!(!session.config().paused);
    }

    #[test]
    fn test_failed_rebuild_renders_empty_then_recovers() {
        let (mut session, _handle) = start(SceneConfig::default());
        let mut frames = FrameIterator::fixed_step(0.1);
        session.backend_mut().fail_materials = true;

        assert!(session.apply(ConfigChange::Material(MaterialKind::Phong)).is_err());
        assert!(session.state().object.is_none());
        assert_eq!(session.tick(&frames.advance()).unwrap(), TickOutcome::Rendered);
        assert_eq!(session.backend().events.last(), Some(&Event::Render(None, None)));

        session.backend_mut().fail_materials = false;
        let outcome = session.apply(ConfigChange::Geometry(GeometryKind::Sphere)).unwrap();
        assert!(matches!(outcome, SyncOutcome::Rebuilt(_)));
        let object = session.state().object.as_ref().unwrap();
        assert_eq!(object.geometry, GeometryKind::Sphere);
        assert_eq!(object.material.kind, MaterialKind::Phong);
    }

    #[test]
    fn test_edits_while_paused_redraw_without_advancing() {
        let config = SceneConfig {
            paused: true,
            ..SceneConfig::default()
        };
        let (mut session, _handle) = start(config);

        session.apply(ConfigChange::Color(Color::ORANGE)).unwrap();
        session.redraw().unwrap();

        assert_eq!(session.backend().renders(), 1);
        assert_eq!(session.state().rotation(), Some(Vec3::ZERO));
        assert_eq!(session.state().object.as_ref().unwrap().material.color, Color::ORANGE);
    }

    #[test]
    fn test_sync_to_preset_applies_pause_state() {
        let (mut session, handle) = start(SceneConfig::default());
        let mut target = preset_by_name("torus").unwrap().config;
        target.paused = true;

        let report = session.sync_to(&target).unwrap();

        assert!(report.rebuilt.is_some());
        assert_eq!(session.config().geometry, GeometryKind::Torus);
        assert_eq!(session.config().material, MaterialKind::Standard);
        assert!(!handle.is_running());
    }

    #[test]
    fn test_resize_ignores_empty_and_unchanged_viewports() {
        let (mut session, _handle) = start(SceneConfig::default());
        session.backend_mut().clear();

        session.resize(DisplayContext::new(0, 0));
        session.resize(viewport());
        assert!(session.backend().events.is_empty());

        let wide = DisplayContext::new(1600, 400);
        session.resize(wide);
        assert_eq!(session.backend().events, vec![Event::Resize(wide)]);
        assert_eq!(session.state().camera.aspect, 4.0);
    }

    #[test]
    fn test_teardown_releases_everything_once() {
        let (mut session, _handle) = start(SceneConfig::default());
        let mut frames = FrameIterator::fixed_step(0.1);
        for _ in 0..3 {
            session.tick(&frames.advance()).unwrap();
        }
        session.apply(ConfigChange::Geometry(GeometryKind::Sphere)).unwrap();

        let (stats, backend) = session.teardown();

        assert_eq!(
            stats,
            SessionStats {
                ticks: 3,
                frames: 3,
                builds: 2,
            }
        );
        assert!(backend.live_geometry.is_empty());
        assert!(backend.live_materials.is_empty());
        assert_eq!(backend.count(&Event::DisposeOverlay), 1);
        assert_eq!(backend.releases(), 4);
    }

    #[test]
    fn test_external_teardown_refuses_further_work() {
        let (mut session, handle) = start(SceneConfig::default());
        let mut frames = FrameIterator::fixed_step(0.1);
        session.backend_mut().clear();

        assert!(handle.teardown());

        assert!(matches!(
            session.apply(ConfigChange::Color(Color::WHITE)),
            Err(SceneError::TornDown)
        ));
        assert!(matches!(session.redraw(), Err(SceneError::TornDown)));
        assert!(matches!(
            session.sync_to(&SceneConfig::default()),
            Err(SceneError::TornDown)
        ));
        assert_eq!(session.tick(&frames.advance()).unwrap(), TickOutcome::Terminated);
        assert!(session.backend().events.is_empty());

        // Still releases what it holds
        let (_, backend) = session.teardown();
        assert_eq!(backend.releases(), 2);
    }
}
