//! Pointer gesture recognition for the map: long press, tap, pan and scroll zoom.

use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::constants::{LONG_PRESS_MIN_DURATION_SECS, PRESS_SLOP_PIXELS};
use crate::geo::MapProjection;

use super::annotations::{Pin, pin_at_screen_point};
use super::view::MapView;
use super::{AnnotationSelected, LongPressBegan};

/// Gesture recognised from a press
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    LongPressBegan(Vec2),
    Tap(Vec2),
    Pan(Vec2),
}

#[derive(Debug, Clone, Copy)]
struct Press {
    origin: Vec2,
    last: Vec2,
    held: f32,
    long_press_fired: bool,
    panning: bool,
}

/// Tracks a single press from down to up.
///
/// A long press fires once, after the minimum hold, if the pointer stays within the slop.
/// Leaving the slop first turns the press into a pan. Releasing before either is a tap.
#[derive(Resource, Debug, Default)]
pub struct PressTracker {
    press: Option<Press>,
}

impl PressTracker {
    pub fn is_active(&self) -> bool {
        self.press.is_some()
    }

    pub fn begin(&mut self, at: Vec2) {
        self.press = Some(Press {
            origin: at,
            last: at,
            held: 0.0,
            long_press_fired: false,
            panning: false,
        });
    }

    pub fn update(&mut self, at: Vec2, dt: f32) -> Option<Gesture> {
        let press = self.press.as_mut()?;

        if press.long_press_fired {
            press.last = at;
            return None;
        }

        if !press.panning && press.origin.distance(at) > PRESS_SLOP_PIXELS {
            press.panning = true;
        }

        if press.panning {
            let delta = at - press.last;
            press.last = at;
            return (delta != Vec2::ZERO).then_some(Gesture::Pan(delta));
        }

        press.last = at;
        press.held += dt;
        if press.held >= LONG_PRESS_MIN_DURATION_SECS {
            press.long_press_fired = true;
            return Some(Gesture::LongPressBegan(press.origin));
        }
        None
    }

    pub fn end(&mut self) -> Option<Gesture> {
        let press = self.press.take()?;
        (!press.long_press_fired && !press.panning).then_some(Gesture::Tap(press.last))
    }
}

/// Whether the pointer is over an egui area; refreshed before map input runs
#[derive(Resource, Debug, Default)]
pub struct PointerOverUi(pub bool);

pub fn track_pointer_over_ui(mut contexts: EguiContexts, mut over_ui: ResMut<PointerOverUi>) {
    over_ui.0 = contexts
        .ctx_mut()
        .is_ok_and(|ctx| ctx.is_pointer_over_area());
}

/// Turn mouse and touch input into map gestures
#[allow(clippy::too_many_arguments)]
pub fn handle_map_gestures(
    time: Res<Time>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    over_ui: Res<PointerOverUi>,
    mut tracker: ResMut<PressTracker>,
    mut map_view: ResMut<MapView>,
    projection: Res<MapProjection>,
    pins: Query<&Pin>,
    mut long_presses: MessageWriter<LongPressBegan>,
    mut selections: MessageWriter<AnnotationSelected>,
) {
    let Ok(window) = window_query.single() else {
        return;
    };

    let touch_position = touches.first_pressed_position();
    let pointer = touch_position.or_else(|| window.cursor_position());
    let pressed = touch_position.is_some() || mouse_button.pressed(MouseButton::Left);

    if !pressed {
        if let Some(Gesture::Tap(at)) = tracker.end()
            && let Some(pin) = pin_at_screen_point(at, pins.iter(), &map_view, &projection)
        {
            debug!("Selected pin at {}", pin.coordinate);
            selections.write(AnnotationSelected {
                coordinate: pin.coordinate,
            });
        }
        return;
    }

    let Some(at) = pointer else {
        return;
    };

    if !tracker.is_active() {
        // Don't start map gestures on UI
        if over_ui.0 {
            return;
        }
        tracker.begin(at);
        return;
    }

    match tracker.update(at, time.delta_secs()) {
        Some(Gesture::LongPressBegan(origin)) => {
            long_presses.write(LongPressBegan {
                screen_point: origin,
            });
        }
        Some(Gesture::Pan(delta)) => {
            map_view.pan_by_pixels(delta, &projection);
        }
        Some(Gesture::Tap(_)) | None => {}
    }
}

pub fn handle_map_zoom(
    mut scroll_events: MessageReader<MouseWheel>,
    over_ui: Res<PointerOverUi>,
    mut map_view: ResMut<MapView>,
) {
    if over_ui.0 {
        scroll_events.clear();
        return;
    }

    for event in scroll_events.read() {
        let scroll_amount = match event.unit {
            MouseScrollUnit::Line => event.y * 0.1,
            MouseScrollUnit::Pixel => event.y * 0.001,
        };
        let factor = (1.0 - scroll_amount as f64).clamp(0.5, 1.5);
        map_view.zoom_by(factor);
    }
}
