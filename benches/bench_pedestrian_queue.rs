// benches/bench_pedestrian_queue.rs
use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, Criterion, PlotConfiguration,
};
use intersection_controller::control_system::pedestrian::PedestrianRequestQueue;
use intersection_controller::data_structures::{Direction, Phase};
use std::time::Duration;

fn bench_release_if_safe(c: &mut Criterion) {
    let mut group = c.benchmark_group("release_if_safe");

    group.sample_size(100);
    group.measurement_time(Duration::from_secs(5));
    group.warm_up_time(Duration::from_secs(2));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    // Presses per direction before each release; duplicates collapse.
    for &presses in [1, 10, 100].iter() {
        group.bench_function(format!("presses_{}", presses), |b| {
            let mut queue = PedestrianRequestQueue::new();
            b.iter(|| {
                for _ in 0..presses {
                    for direction in Direction::ALL {
                        queue.request(direction);
                    }
                }
                for phase in Phase::CYCLE {
                    black_box(queue.release_if_safe(phase));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_release_if_safe);
criterion_main!(benches);
