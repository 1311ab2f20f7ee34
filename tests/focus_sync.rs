use std::cell::RefCell;
use std::rc::Rc;

use egui::Color32;
use hoverlink::render::{HoverScene, MarkerState, Orientation};
use hoverlink::*;

// 400x300 chart, 320x240 plot: 80 px per x unit, 30 px per y unit.
const MARGIN: Margin = Margin {
    top: 30.0,
    right: 30.0,
    bottom: 30.0,
    left: 50.0,
};

fn chart_box() -> ChartBox {
    ChartBox::new(400.0, 300.0, MARGIN)
}

fn scales() -> (LinearScale, LinearScale) {
    (
        LinearScale::new((0.0, 4.0), (0.0, 320.0)),
        LinearScale::new((0.0, 8.0), (240.0, 0.0)),
    )
}

fn series() -> Vec<Series> {
    let xs = vec![0.0, 1.0, 2.0, 3.0, 4.0];
    vec![
        Series::new("S1", Color32::RED, xs.clone(), vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap(),
        Series::new("S2", Color32::BLUE, xs, vec![8.0, 7.0, 6.0, 5.0, 4.0]).unwrap(),
    ]
}

// chart-space position of data point (x, y)
fn at(x: f64, y: f64) -> PixelPos {
    PixelPos::new(50.0 + x * 80.0, 30.0 + 240.0 - y * 30.0)
}

fn group(n: usize) -> FocusGroup<HoverScene> {
    let mut g = FocusGroup::default();
    for _ in 0..n {
        let (x, y) = scales();
        let i = g.add_chart(chart_box(), x, y, HoverScene::new());
        g.chart_mut(i).unwrap().set_series(series());
    }
    g
}

fn scene(g: &FocusGroup<HoverScene>, i: usize) -> &HoverScene {
    g.chart(i).unwrap().renderer()
}

#[test]
fn marker_click_locks_focus_and_blocks_hover_everywhere() {
    let mut g = group(2);
    g.dispatch(0, PointerEvent::Move(at(2.0, 3.0)));
    g.dispatch(0, PointerEvent::MarkerClick("S1".into()));

    let state = g.state();
    assert_eq!(state.chart_index, Some(0));
    assert!(state.active);
    assert_eq!(state.x_step, Some(2.0));
    assert_eq!(
        scene(&g, 0).marker(&"S1".into()).unwrap().state,
        MarkerState::Focused
    );

    let before = [scene(&g, 0).revision(), scene(&g, 1).revision()];
    g.dispatch(1, PointerEvent::Move(at(1.0, 2.0)));
    g.dispatch(0, PointerEvent::Move(at(3.0, 4.0)));
    g.dispatch(1, PointerEvent::Leave(PixelPos::new(-50.0, -50.0)));
    assert_eq!([scene(&g, 0).revision(), scene(&g, 1).revision()], before);
    assert_eq!(g.state(), state);
}

#[test]
fn background_click_on_other_chart_clears_then_takes_focus() {
    let mut g = group(2);
    let log: Rc<RefCell<Vec<SyncMessage>>> = Rc::default();

    g.dispatch(0, PointerEvent::Move(at(2.0, 3.0)));
    g.dispatch(0, PointerEvent::MarkerClick("S1".into()));
    assert!(g.state().is_owned_by(0));

    // a standalone engine at index 1 sharing the group's state shows what
    // chart 1 sends
    let seen = log.clone();
    let (x, y) = scales();
    let mut sender = HoverEngine::new(1, chart_box(), x, y, HoverScene::new(), g.focus_handle())
        .with_sink(move |env: SyncEnvelope| seen.borrow_mut().push(env.message));
    sender.set_series(series());
    sender.on_background_click(at(1.0, 7.0));
    let messages = log.borrow();
    assert_eq!(messages[0], SyncMessage::Clear);
    assert!(matches!(
        &messages[1],
        SyncMessage::ActivePointUpdate { point, focused_active: Some(false) }
            if point.key.as_str() == "S2" && point.chart_index == 1
    ));

    // the same click through the group
    g.dispatch(1, PointerEvent::BackgroundClick(at(1.0, 7.0)));
    let state = g.state();
    assert_eq!(state.chart_index, Some(1));
    assert!(!state.active);
    assert_eq!(state.active_point.as_ref().map(|p| p.key.as_str()), Some("S2"));
    // chart 0 follows chart 1's x and lost its focused marker
    let s0 = scene(&g, 0);
    assert!(s0.markers().iter().all(|m| m.state == MarkerState::Normal));
    assert_eq!(s0.guide_line(Orientation::Vertical).unwrap().line.x1, 80.0);

    // hover works again
    g.dispatch(0, PointerEvent::Move(at(3.0, 4.0)));
    assert_eq!(g.state().chart_index, Some(0));
}

#[test]
fn set_active_line_without_x_step_only_styles_the_series() {
    let mut g = group(2);
    g.chart_mut(0)
        .unwrap()
        .set_active_line(&"S2".into(), RedrawPolicy::Diff);
    assert_eq!(g.process_sync(), 0);

    let s = scene(&g, 0);
    assert_eq!(s.active_series().map(|k| k.as_str()), Some("S2"));
    assert!(s.markers().is_empty());
    assert!(s.guide_line(Orientation::Vertical).is_none());
    assert!(s.guide_line(Orientation::Horizontal).is_none());
    assert!(scene(&g, 1).is_clear());
}

#[test]
fn set_active_line_is_ignored_for_foreign_owner() {
    let mut g = group(2);
    g.dispatch(0, PointerEvent::Move(at(1.0, 2.0)));
    let rev = scene(&g, 1).revision();
    g.chart_mut(1)
        .unwrap()
        .set_active_line(&"S2".into(), RedrawPolicy::Always);
    assert_eq!(scene(&g, 1).revision(), rev);
    assert_eq!(g.process_sync(), 0);
}

#[test]
fn hover_propagates_to_every_sibling() {
    let mut g = group(3);
    g.dispatch(1, PointerEvent::Move(at(3.0, 4.0)));
    for i in [0, 2] {
        let s = scene(&g, i);
        assert_eq!(s.guide_line(Orientation::Vertical).unwrap().line.x1, 240.0);
        assert_eq!(s.markers().len(), 2);
        assert!(s.axis_label(Orientation::Vertical).is_some());
        assert!(s.axis_label(Orientation::Horizontal).is_none());
    }
    assert!(scene(&g, 1).guide_line(Orientation::Horizontal).is_some());
}

#[test]
fn init_restores_owner_point_and_lock() {
    let mut g = group(2);
    g.dispatch(1, PointerEvent::Move(at(1.0, 7.0)));
    g.dispatch(1, PointerEvent::MarkerClick("S2".into()));

    // rebind after a "resize" and re-initialize everyone
    for i in 0..2 {
        let (x, y) = scales();
        let engine = g.chart_mut(i).unwrap();
        engine.update_scales(chart_box(), x, y);
        engine.clear_hover_attributes();
    }
    g.init_all();

    let state = g.state();
    assert_eq!(state.chart_index, Some(1));
    assert!(state.active);
    assert_eq!(
        scene(&g, 1).marker(&"S2".into()).unwrap().state,
        MarkerState::Focused
    );
    assert_eq!(scene(&g, 0).guide_line(Orientation::Vertical).unwrap().line.x1, 80.0);
}

#[test]
fn leave_clears_all_charts_when_unlocked() {
    let mut g = group(2);
    g.dispatch(0, PointerEvent::Move(at(1.0, 2.0)));
    g.dispatch(0, PointerEvent::Leave(PixelPos::new(-50.0, -50.0)));
    assert_eq!(g.state(), FocusedState::default());
    assert!(scene(&g, 0).is_clear());
    assert!(scene(&g, 1).is_clear());
}

#[test]
fn background_click_by_owner_sends_no_clear() {
    let mut g = group(2);
    g.dispatch(0, PointerEvent::Move(at(2.0, 3.0)));
    g.dispatch(0, PointerEvent::MarkerClick("S1".into()));
    assert!(g.state().is_owned_by(0));

    let log: Rc<RefCell<Vec<SyncMessage>>> = Rc::default();
    let seen = log.clone();
    let (x, y) = scales();
    let mut owner = HoverEngine::new(0, chart_box(), x, y, HoverScene::new(), g.focus_handle())
        .with_sink(move |env: SyncEnvelope| seen.borrow_mut().push(env.message));
    owner.set_series(series());
    owner.on_background_click(at(1.0, 7.0));
    let messages = log.borrow();
    assert_eq!(messages.len(), 1);
    assert!(matches!(
        &messages[0],
        SyncMessage::ActivePointUpdate { point, focused_active: Some(false) }
            if point.key.as_str() == "S2"
    ));

    // through the group the owner keeps focus, unlocked
    g.dispatch(0, PointerEvent::BackgroundClick(at(1.0, 7.0)));
    let state = g.state();
    assert_eq!(state.chart_index, Some(0));
    assert!(!state.active);
}

#[test]
fn set_active_line_is_ignored_while_own_lock_is_held() {
    let mut g = group(2);
    g.dispatch(0, PointerEvent::Move(at(2.0, 3.0)));
    g.dispatch(0, PointerEvent::MarkerClick("S1".into()));
    let state = g.state();
    let rev = scene(&g, 0).revision();

    let engine = g.chart_mut(0).unwrap();
    engine.set_active_line(&"S2".into(), RedrawPolicy::Always);
    assert_eq!(engine.line_key().map(|k| k.as_str()), Some("S1"));
    assert_eq!(scene(&g, 0).revision(), rev);
    assert_eq!(g.process_sync(), 0);
    assert_eq!(g.state(), state);
}

#[test]
fn sample_at_zero_gets_a_zero_label() {
    let mut g = group(2);
    g.dispatch(0, PointerEvent::Move(at(0.0, 1.0)));
    let s = scene(&g, 0);
    assert_eq!(s.axis_label(Orientation::Vertical).unwrap().text, "0");
    assert_eq!(s.axis_label(Orientation::Horizontal).unwrap().text, "1");
    assert_eq!(g.state().active_point.map(|p| p.x_value), Some("0".to_string()));
    assert_eq!(scene(&g, 1).axis_label(Orientation::Vertical).unwrap().text, "0");
}

#[test]
fn hand_built_config_with_huge_precision_still_hovers() {
    let mut cfg = HoverConfig::default();
    cfg.value_precision = 1 << 31;
    let mut g = FocusGroup::new(cfg);
    let (x, y) = scales();
    let i = g.add_chart(chart_box(), x, y, HoverScene::new());
    g.chart_mut(i)
        .unwrap()
        .set_series(vec![Series::new("S1", Color32::RED, vec![0.0, 1.0], vec![0.5, 2.25]).unwrap()]);
    g.dispatch(i, PointerEvent::Move(at(1.0, 2.25)));
    let s = scene(&g, i);
    assert_eq!(s.axis_label(Orientation::Vertical).unwrap().text, "1");
    assert_eq!(s.axis_label(Orientation::Horizontal).unwrap().text, "2.25");
}
