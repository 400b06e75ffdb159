use std::time::Duration;

use chartkit::animation::FRAME_DURATION;
use chartkit::{
    Attr, AxisId, Chart, ChartConfig, ChartKind, DataArray, DataValue, Dataset, Element, Model,
};

fn line_chart(values: &[f64]) -> Chart {
    Chart::new(
        ChartConfig::new(ChartKind::Line)
            .labels(["a", "b", "c", "d"])
            .dataset(Dataset::new("series", values.iter().copied()))
            .animation_duration(Duration::ZERO),
    )
    .unwrap()
}

fn views(chart: &Chart) -> Vec<Model> {
    chart
        .dataset_meta(0)
        .unwrap()
        .data
        .iter()
        .map(|el| el.view().cloned().unwrap())
        .collect()
}

#[test]
fn append_keeps_existing_elements() {
    let mut chart = line_chart(&[1.0, 2.0, 3.0]);
    let before = views(&chart);
    assert_eq!(before.len(), 3);

    chart.data().datasets[0].data().append([4.0]);
    {
        let meta = chart.dataset_meta(0).unwrap();
        assert_eq!(meta.data.len(), 4);
        for (element, view) in meta.data.iter().zip(&before) {
            assert_eq!(element.view(), Some(view));
            assert!(!element.is_pending_reset());
        }
        assert!(meta.data[3].is_pending_reset());
        assert!(meta.data[3].view().is_none());
    }

    chart.update_with(Some(FRAME_DURATION * 4), false).unwrap();
    let base = chart.scale(AxisId::Y_PRIMARY).unwrap().base_pixel();
    let meta = chart.dataset_meta(0).unwrap();
    let added = &meta.data[3];
    assert!(!added.is_pending_reset());
    // Animates in from the reset state.
    assert_eq!(added.view().and_then(|v| v.get("y")), Some(&Attr::Number(base)));
    assert_eq!(added.view().and_then(|v| v.get("radius")), Some(&Attr::Number(0.0)));
    assert!(added.is_animating());
}

#[test]
fn append_during_animation_rises_from_base() {
    let mut chart = Chart::new(
        ChartConfig::new(ChartKind::Line)
            .labels(["a", "b", "c", "d"])
            .dataset(Dataset::new("series", [1.0, 2.0, 3.0]))
            .animation_duration(FRAME_DURATION * 60),
    )
    .unwrap();
    assert!(chart.is_animating());
    chart.advance_frame(FRAME_DURATION).unwrap();

    chart.data().datasets[0].data().append([4.0]);
    chart.advance_frame(FRAME_DURATION).unwrap();
    {
        let meta = chart.dataset_meta(0).unwrap();
        assert!(meta.data[3].is_pending_reset());
        assert!(meta.data[3].view().is_none());
    }

    chart.update().unwrap();
    let base = chart.scale(AxisId::Y_PRIMARY).unwrap().base_pixel();
    let (target_x, target_y) = {
        let meta = chart.dataset_meta(0).unwrap();
        let added = &meta.data[3];
        assert_eq!(added.view().and_then(|v| v.get("y")), Some(&Attr::Number(base)));
        assert_eq!(added.view().and_then(|v| v.get("radius")), Some(&Attr::Number(0.0)));
        (
            added.model().get("x").and_then(Attr::as_number).unwrap(),
            added.model().get("y").and_then(Attr::as_number).unwrap(),
        )
    };

    chart.advance_frame(FRAME_DURATION).unwrap();
    let meta = chart.dataset_meta(0).unwrap();
    let added = &meta.data[3];
    let y = added.number("y").unwrap();
    assert!(y >= base.min(target_y) && y <= base.max(target_y));
    assert_eq!(added.number("x"), Some(target_x));
}

#[test]
fn splice_removes_the_matching_element() {
    let chart = line_chart(&[1.0, 2.0, 3.0]);
    let before = views(&chart);

    let removed = chart.data().datasets[0]
        .data()
        .splice_replace(1, 1, Vec::<f64>::new());
    assert_eq!(removed, vec![DataValue::from(2.0)]);
    assert_eq!(
        chart.data().datasets[0].data().to_vec(),
        vec![DataValue::from(1.0), DataValue::from(3.0)]
    );

    let meta = chart.dataset_meta(0).unwrap();
    assert_eq!(meta.data.len(), 2);
    assert_eq!(meta.data[0].view(), Some(&before[0]));
    assert_eq!(meta.data[1].view(), Some(&before[2]));
}

#[test]
fn head_and_tail_mutations() {
    let mut chart = line_chart(&[1.0, 2.0, 3.0]);
    let before = views(&chart);
    let data = chart.data().datasets[0].data().clone();

    data.remove_first();
    data.remove_last();
    assert_eq!(chart.dataset_meta(0).unwrap().data[0].view(), Some(&before[1]));

    data.prepend([0.0, 0.5]);
    {
        let meta = chart.dataset_meta(0).unwrap();
        assert_eq!(meta.data.len(), 3);
        assert!(meta.data[0].is_pending_reset());
        assert!(meta.data[1].is_pending_reset());
        assert_eq!(meta.data[2].view(), Some(&before[1]));
    }

    chart.update().unwrap();
    let meta = chart.dataset_meta(0).unwrap();
    assert!(meta.data.iter().all(|el| !el.is_pending_reset()));
    assert!(meta.data.iter().all(|el| el.view() == Some(el.model())));
}

#[test]
fn out_of_range_mutations_are_clamped() {
    let chart = line_chart(&[1.0, 2.0]);
    let data = chart.data().datasets[0].data().clone();

    data.splice_replace(10, 5, [7.0]);
    assert_eq!(data.len(), 3);
    assert_eq!(chart.dataset_meta(0).unwrap().data.len(), 3);

    let empty = DataArray::new();
    assert_eq!(empty.remove_first(), None);
    assert_eq!(empty.remove_last(), None);
}

#[test]
fn replaced_data_resyncs_on_update() {
    let mut chart = line_chart(&[1.0, 2.0, 3.0]);
    let old = chart.data().datasets[0].data().clone();

    chart.data_mut().datasets[0].set_data(DataArray::from_values([5.0, 6.0]));
    chart.update().unwrap();
    assert!(!old.is_observed());
    assert!(chart.data().datasets[0].data().is_observed());
    assert_eq!(chart.dataset_meta(0).unwrap().data.len(), 2);

    old.append([9.0]);
    assert_eq!(chart.dataset_meta(0).unwrap().data.len(), 2);
}

#[test]
fn shared_data_drives_every_observer() {
    let shared = DataArray::from_values([1.0, 2.0]);
    let chart = Chart::new(
        ChartConfig::new(ChartKind::Line)
            .labels(["a", "b", "c"])
            .dataset(Dataset::with_data("one", shared.clone()))
            .dataset(Dataset::with_data("two", shared.clone()))
            .animation_duration(Duration::ZERO),
    )
    .unwrap();
    assert_eq!(shared.listener_count(), 2);

    shared.append([3.0]);
    assert_eq!(chart.dataset_meta(0).unwrap().data.len(), 3);
    assert_eq!(chart.dataset_meta(1).unwrap().data.len(), 3);
}

#[test]
fn transition_at_one_is_idempotent() {
    let mut element = Element::new()
        .with("x", 10.0)
        .with("backgroundColor", "rgb(255, 0, 0)")
        .with("_index", 0.0);
    element.pivot();

    element.model_mut().insert("x".into(), Attr::Number(42.0));
    element
        .model_mut()
        .insert("backgroundColor".into(), Attr::from("rgb(0, 0, 255)"));
    element.pivot();
    element.transition(0.3);

    element.transition(1.0);
    let settled = element.view().cloned();
    element.transition(1.0);
    assert_eq!(element.view().cloned(), settled);

    let view = element.view().unwrap();
    for (key, value) in element.model().iter().filter(|(k, _)| !k.starts_with('_')) {
        assert_eq!(view.get(key), Some(value));
    }
}

#[test]
fn transition_is_monotonic_in_ease() {
    let mut element = Element::new().with("y", 0.0);
    element.pivot();
    element.model_mut().insert("y".into(), Attr::Number(100.0));
    element.pivot();

    let mut last = 0.0;
    for step in 1..=10 {
        element.transition(step as f64 / 10.0);
        let y = element.number("y").unwrap();
        assert!(y >= last && y <= 100.0);
        last = y;
    }
    assert_eq!(last, 100.0);
}
