//! Shared wiring for machine tests.

use std::rc::Rc;

use rps_player_adapters::infrastructure::testing::{
    FakeCamera, ManualScheduler, MemoryStorage, RecordingConnection, RecordingView, ScriptedRandom,
};
use rps_player_ports::outbound::CameraPort;
use rps_player_ports::ClientConfig;

use crate::application::context::{PortSet, SessionContext};

/// Fakes for every outbound port, kept so tests can inspect them
pub struct TestHarness {
    pub connection: Rc<RecordingConnection>,
    pub camera: Rc<FakeCamera>,
    pub storage: Rc<MemoryStorage>,
    pub scheduler: Rc<ManualScheduler>,
    pub random: Rc<ScriptedRandom>,
    pub view: Rc<RecordingView>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            connection: Rc::new(RecordingConnection::new("ws://test/ws")),
            camera: Rc::new(FakeCamera::new()),
            storage: Rc::new(MemoryStorage::default()),
            scheduler: Rc::new(ManualScheduler::default()),
            random: Rc::new(ScriptedRandom::default()),
            view: Rc::new(RecordingView::default()),
        }
    }

    pub fn context(&self) -> SessionContext {
        self.context_with_camera(self.camera.clone())
    }

    pub fn context_with_camera(&self, camera: Rc<dyn CameraPort>) -> SessionContext {
        SessionContext::new(
            PortSet {
                connection: self.connection.clone(),
                camera,
                storage: self.storage.clone(),
                scheduler: self.scheduler.clone(),
                random: self.random.clone(),
                view: self.view.clone(),
            },
            ClientConfig::default(),
        )
    }
}
