pub mod pedestrian;
pub mod timer;
pub mod traffic_light_controller;
