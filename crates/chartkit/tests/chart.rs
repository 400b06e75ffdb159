use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use chartkit::animation::FRAME_DURATION;
use chartkit::{
    AnimationConfig, AnimationProgress, Attr, AxisId, Chart, ChartConfig, ChartError, ChartKind,
    ChartOptionsConfig, Dataset, EasingFunction, Rect, ScaleKind,
};

fn still(config: ChartConfig) -> Chart {
    Chart::new(config.animation_duration(Duration::ZERO)).unwrap()
}

fn two_series() -> ChartConfig {
    ChartConfig::new(ChartKind::Line)
        .labels(["a", "b"])
        .dataset(Dataset::new("small", [1.0, 2.0]))
        .dataset(Dataset::new("large", [100.0, 200.0]))
}

fn view_number(chart: &Chart, dataset: usize, index: usize, key: &str) -> f64 {
    chart.dataset_meta(dataset).unwrap().data[index]
        .view()
        .and_then(|v| v.get(key))
        .and_then(Attr::as_number)
        .unwrap()
}

fn model_number(chart: &Chart, dataset: usize, index: usize, key: &str) -> f64 {
    chart.dataset_meta(dataset).unwrap().data[index]
        .model()
        .get(key)
        .and_then(Attr::as_number)
        .unwrap()
}

#[test]
fn animation_runs_callbacks() {
    let progressed = Rc::new(Cell::new(0));
    let completed = Rc::new(Cell::new(0));
    let (p, c) = (progressed.clone(), completed.clone());

    let options = ChartOptionsConfig {
        animation: AnimationConfig {
            duration: Some(FRAME_DURATION * 4),
            easing: Some(EasingFunction::Linear),
            on_progress: Some(Rc::new(move |_: &AnimationProgress| p.set(p.get() + 1))),
            on_complete: Some(Rc::new(move |_: &AnimationProgress| c.set(c.get() + 1))),
        },
        ..Default::default()
    };
    let mut chart = Chart::new(
        ChartConfig::new(ChartKind::Line)
            .labels(["a", "b", "c"])
            .dataset(Dataset::new("s", [10.0, 20.0, 30.0]))
            .options(options),
    )
    .unwrap();
    assert!(chart.is_animating());

    let base = chart.scale(AxisId::Y_PRIMARY).unwrap().base_pixel();
    let target = model_number(&chart, 0, 2, "y");

    chart.advance_frame(FRAME_DURATION).unwrap();
    let progress = chart.advance_frame(FRAME_DURATION).unwrap();
    assert!((progress.ease - 0.5).abs() < 1e-9);
    let halfway = view_number(&chart, 0, 2, "y");
    assert!((halfway - (base + (target - base) * 0.5)).abs() < 1e-9);

    let progress = chart.advance_frame(FRAME_DURATION * 5).unwrap();
    assert!(progress.is_complete());
    assert_eq!(progress.ease, 1.0);
    assert_eq!(progressed.get(), 3);
    assert_eq!(completed.get(), 1);
    assert!(!chart.is_animating());
    assert!(chart.advance_frame(FRAME_DURATION).is_none());

    let meta = chart.dataset_meta(0).unwrap();
    assert!(meta.data.iter().all(|el| el.view() == Some(el.model())));
}

#[test]
fn zero_duration_completes_immediately() {
    let completed = Rc::new(Cell::new(0));
    let c = completed.clone();
    let mut config = ChartConfig::new(ChartKind::Bar)
        .labels(["a"])
        .dataset(Dataset::new("s", [3.0]))
        .animation_duration(Duration::ZERO);
    config.options.animation.on_complete = Some(Rc::new(move |p: &AnimationProgress| {
        assert!(p.is_complete());
        c.set(c.get() + 1);
    }));

    let mut chart = Chart::new(config).unwrap();
    assert_eq!(completed.get(), 1);
    assert!(!chart.is_animating());

    chart.update().unwrap();
    assert_eq!(completed.get(), 2);
}

#[test]
fn stop_and_lazy_render() {
    let mut chart = Chart::new(
        ChartConfig::new(ChartKind::Line)
            .labels(["a"])
            .dataset(Dataset::new("s", [1.0])),
    )
    .unwrap();
    assert!(chart.is_animating());

    chart.stop();
    assert!(!chart.is_animating());
    assert!(chart.advance_frame(FRAME_DURATION).is_none());

    chart.update_with(Some(Duration::from_secs(1)), true).unwrap();
    assert!(!chart.is_animating());
    assert!(chart.advance_frame(FRAME_DURATION).is_some());
}

#[test]
fn resize_relayouts_scales() {
    let mut chart = still(
        ChartConfig::new(ChartKind::Line)
            .labels(["a", "b"])
            .dataset(Dataset::new("s", [1.0, 2.0]))
            .size(200.0, 100.0),
    );
    assert_eq!(chart.chart_area(), Rect::new(0.0, 0.0, 200.0, 100.0));
    let before = view_number(&chart, 0, 1, "x");

    chart.resize(400.0, 300.0).unwrap();
    assert_eq!((chart.width(), chart.height()), (400.0, 300.0));
    assert_eq!(chart.chart_area(), Rect::new(0.0, 0.0, 400.0, 300.0));
    assert_eq!(chart.scale(AxisId::X_PRIMARY).unwrap().geometry().width, 400.0);
    assert!(view_number(&chart, 0, 1, "x") > before);
    assert!(!chart.is_animating());

    chart.resize(400.0, 300.0).unwrap();
    assert!(chart.dirty_flags().is_empty());
}

#[test]
fn visibility_override() {
    let mut chart = still(two_series());
    assert_eq!(chart.visible_dataset_count(), 2);
    assert!(chart.scale(AxisId::Y_PRIMARY).unwrap().max() >= 200.0);

    chart.set_dataset_hidden(1, Some(true)).unwrap();
    assert!(!chart.is_dataset_visible(1));
    assert_eq!(chart.visible_dataset_count(), 1);
    chart.update().unwrap();
    assert!(chart.scale(AxisId::Y_PRIMARY).unwrap().max() < 100.0);

    chart.set_dataset_hidden(1, None).unwrap();
    assert!(chart.is_dataset_visible(1));

    chart.data_mut().datasets[0].hidden = true;
    assert!(!chart.is_dataset_visible(0));
    chart.set_dataset_hidden(0, Some(false)).unwrap();
    assert!(chart.is_dataset_visible(0));

    assert!(!chart.is_dataset_visible(7));
    assert_eq!(
        chart.set_dataset_hidden(7, Some(true)),
        Err(ChartError::DatasetOutOfRange { index: 7, len: 2 })
    );
}

#[test]
fn reset_returns_elements_to_base() {
    let mut chart = still(two_series());
    chart.reset().unwrap();
    let base = chart.scale(AxisId::Y_PRIMARY).unwrap().base_pixel();
    assert_eq!(model_number(&chart, 1, 0, "y"), base);

    chart.draw(1.0);
    assert_eq!(view_number(&chart, 1, 0, "y"), base);
    assert_eq!(view_number(&chart, 1, 0, "radius"), 0.0);
}

#[test]
fn radar_points_follow_spokes() {
    let chart = still(
        ChartConfig::new(ChartKind::Radar)
            .labels(["n", "e", "s", "w"])
            .dataset(Dataset::new("s", [10.0, 20.0, 10.0, 5.0])),
    );
    let scale = chart.scales().radial().unwrap();
    assert_eq!(scale.spoke_count(), 4);
    assert_eq!(chart.scale(AxisId::RADIAL).unwrap().kind(), ScaleKind::RadialLinear);

    let center = scale.center();
    assert!((model_number(&chart, 0, 0, "x") - center.x).abs() < 1e-9);
    assert!(model_number(&chart, 0, 0, "y") < center.y);
    assert!(model_number(&chart, 0, 1, "x") > center.x);

    let meta = chart.dataset_meta(0).unwrap();
    assert_eq!(meta.x_axis_id, None);
    let line = meta.dataset.as_ref().unwrap();
    assert_eq!(line.model().get("_loop"), Some(&Attr::Flag(true)));
    assert_eq!(line.model().get("tension"), Some(&Attr::Number(0.0)));
}

#[test]
fn options_change_rebuilds_scales() {
    let mut chart = still(
        ChartConfig::new(ChartKind::Line)
            .labels(["a", "b"])
            .dataset(Dataset::new("s", [1.0, 1000.0])),
    );
    assert_eq!(chart.scale(AxisId::Y_PRIMARY).unwrap().kind(), ScaleKind::Linear);

    chart.options_mut().y_axes = vec![chartkit::ScaleConfig::of(ScaleKind::Logarithmic)];
    chart.update().unwrap();
    let y = chart.scale(AxisId::Y_PRIMARY).unwrap();
    assert_eq!(y.kind(), ScaleKind::Logarithmic);
    assert_eq!((y.min(), y.max()), (1.0, 1000.0));
}

#[test]
fn destroy_detaches_data() {
    let mut chart = still(two_series());
    let data = chart.data().datasets[0].data().clone();
    assert!(data.is_observed());

    chart.destroy();
    assert!(!data.is_observed());
    assert!(chart.scales().is_empty());
    assert_eq!(chart.resize(10.0, 10.0), Err(ChartError::Destroyed));
    assert_eq!(chart.reset(), Err(ChartError::Destroyed));
}
