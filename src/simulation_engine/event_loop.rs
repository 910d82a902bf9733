use tokio::sync::mpsc::UnboundedReceiver;

use crate::control_system::timer::Scheduler;
use crate::control_system::traffic_light_controller::TrafficLightController;
use crate::monitoring::output_sink::OutputSink;
use crate::shared_data::IntersectionEvent;

/// Drains the event queue into the controller, one event at a time and in
/// arrival order, until a shutdown event or until every sender is gone.
pub async fn run_event_loop<O: OutputSink, S: Scheduler>(
    controller: &mut TrafficLightController<O, S>,
    mut events: UnboundedReceiver<IntersectionEvent>,
) {
    while let Some(event) = events.recv().await {
        log::debug!("Handling {:?}", event);
        if !controller.handle_event(event) {
            return;
        }
    }
    log::info!("Event channel closed");
    controller.shutdown();
}
