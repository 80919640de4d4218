//! Headless app tests for the pin and route lifecycle.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;

use super::{ClearAllRequest, InteractionPhase, RecenterSchedule, ScreenPlugin};
use crate::config::AppConfig;
use crate::geo::{Coordinate, MapProjection, Region};
use crate::location::{CurrentLocation, Fix, RecenterRequest};
use crate::map::{
    AnnotationSelected, LongPressBegan, MapView, Pin, RouteOverlay, SetRegion, UserTrackingMode,
};
use crate::routing::{
    DirectionsClient, DirectionsError, DirectionsRequest, DirectionsService, Route,
    RouteOutcome, RouteRequested, RouteSequence, RouteSettled, RoutingPlugin,
};
use crate::ui::DialogState;

const HOME: Coordinate = Coordinate::new(37.3349, -122.00902);
const SHOP: Coordinate = Coordinate::new(37.3318, -122.0312);
const PARK: Coordinate = Coordinate::new(37.3229, -122.0322);

#[derive(Resource, Default)]
struct Observed {
    route_requests: Vec<Coordinate>,
    regions: Vec<SetRegion>,
    settled: Vec<RouteOutcome>,
}

fn observe(
    mut requests: MessageReader<RouteRequested>,
    mut regions: MessageReader<SetRegion>,
    mut settled: MessageReader<RouteSettled>,
    mut observed: ResMut<Observed>,
) {
    observed.settled.extend(settled.read().map(|s| s.outcome));
    observed
        .route_requests
        .extend(requests.read().map(|r| r.destination));
    observed.regions.extend(regions.read().copied());
}

fn test_app() -> App {
    let mut view = MapView::default();
    view.viewport = Vec2::new(400.0, 800.0);
    view.region = Region::around(HOME, 5000.0, 5000.0);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(view)
        .insert_resource(MapProjection::new(HOME))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(200)))
        .init_resource::<CurrentLocation>()
        .init_resource::<RouteSequence>()
        .init_resource::<DialogState>()
        .init_resource::<ButtonInput<KeyCode>>()
        .init_resource::<Observed>()
        .add_message::<LongPressBegan>()
        .add_message::<AnnotationSelected>()
        .add_message::<RouteRequested>()
        .add_message::<RouteSettled>()
        .add_message::<RecenterRequest>()
        .add_message::<SetRegion>()
        .add_plugins(ScreenPlugin)
        .add_systems(PostUpdate, observe);
    app
}

fn count<C: Component>(app: &mut App) -> usize {
    let mut query = app.world_mut().query_filtered::<(), With<C>>();
    query.iter(app.world()).count()
}

fn long_press(app: &mut App, screen_point: Vec2) {
    app.world_mut().write_message(LongPressBegan { screen_point });
    app.update();
}

fn spawn_overlay(app: &mut App) {
    app.world_mut().spawn(RouteOverlay {
        polyline: vec![HOME, SHOP],
        region: Region::around(HOME, 3000.0, 3000.0),
        distance_meters: 2100.0,
        expected_travel_time_secs: 240.0,
    });
}

#[test]
fn test_long_press_places_pin_under_touch() {
    let mut app = test_app();
    let point = Vec2::new(120.0, 300.0);

    long_press(&mut app, point);

    let expected = {
        let world = app.world();
        world
            .resource::<MapView>()
            .screen_to_coordinate(point, world.resource::<MapProjection>())
    };
    let mut query = app.world_mut().query::<&Pin>();
    let pins: Vec<Pin> = query.iter(app.world()).copied().collect();
    assert_eq!(pins, vec![Pin { coordinate: expected }]);
    assert_eq!(
        *app.world().resource::<InteractionPhase>(),
        InteractionPhase::Idle
    );
}

#[test]
fn test_each_long_press_adds_one_pin() {
    let mut app = test_app();
    long_press(&mut app, Vec2::new(100.0, 100.0));
    long_press(&mut app, Vec2::new(100.0, 100.0));

    app.world_mut().write_message(LongPressBegan {
        screen_point: Vec2::new(300.0, 500.0),
    });
    app.world_mut().write_message(LongPressBegan {
        screen_point: Vec2::new(50.0, 700.0),
    });
    app.update();

    assert_eq!(count::<Pin>(&mut app), 4);
}

#[test]
fn test_selection_replaces_overlay_and_requests_route() {
    let mut app = test_app();
    spawn_overlay(&mut app);
    app.world_mut()
        .write_message(AnnotationSelected { coordinate: SHOP });

    app.update();

    assert_eq!(count::<RouteOverlay>(&mut app), 0);
    assert_eq!(app.world().resource::<Observed>().route_requests, vec![SHOP]);
    assert_eq!(
        *app.world().resource::<InteractionPhase>(),
        InteractionPhase::RouteRequested
    );

    app.world_mut().write_message(RouteSettled {
        outcome: RouteOutcome::Failed,
    });
    app.update();

    assert_eq!(
        *app.world().resource::<InteractionPhase>(),
        InteractionPhase::Idle
    );
}

#[test]
fn test_clear_removes_pins_and_overlays() {
    let mut app = test_app();
    for x in [80.0, 200.0, 320.0] {
        long_press(&mut app, Vec2::new(x, 400.0));
    }
    spawn_overlay(&mut app);
    app.update();
    assert_eq!(count::<Pin>(&mut app), 3);
    assert_eq!(count::<RouteOverlay>(&mut app), 1);

    app.world_mut().write_message(ClearAllRequest);
    app.update();

    assert_eq!(count::<Pin>(&mut app), 0);
    assert_eq!(count::<RouteOverlay>(&mut app), 0);
}

#[test]
fn test_clear_on_empty_map_is_harmless() {
    let mut app = test_app();
    app.world_mut().write_message(ClearAllRequest);
    app.update();

    assert_eq!(count::<Pin>(&mut app), 0);
    long_press(&mut app, Vec2::new(200.0, 400.0));
    assert_eq!(count::<Pin>(&mut app), 1);
}

#[test]
fn test_clear_orphans_in_flight_route() {
    let mut app = test_app();
    let token = app.world_mut().resource_mut::<RouteSequence>().next_token();

    app.world_mut().write_message(ClearAllRequest);
    app.update();

    assert!(!app.world().resource::<RouteSequence>().is_current(token));
}

#[test]
fn test_delete_key_clears_unless_dialog_open() {
    let mut app = test_app();
    long_press(&mut app, Vec2::new(200.0, 400.0));

    app.world_mut().resource_mut::<DialogState>().any_modal_open = true;
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(KeyCode::Delete);
    app.update();
    assert_eq!(count::<Pin>(&mut app), 1);

    app.world_mut().resource_mut::<DialogState>().any_modal_open = false;
    let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    keyboard.release(KeyCode::Delete);
    keyboard.clear();
    keyboard.press(KeyCode::Delete);
    app.update();
    assert_eq!(count::<Pin>(&mut app), 0);
}

fn show_user_at(app: &mut App, coordinate: Coordinate) {
    app.world_mut().resource_mut::<CurrentLocation>().fix = Some(Fix {
        coordinate,
        heading_degrees: None,
    });
    let mut view = app.world_mut().resource_mut::<MapView>();
    view.shows_user_location = true;
    view.tracking_mode = UserTrackingMode::None;
}

#[test]
fn test_recenter_fires_after_delay() {
    let mut app = test_app();
    show_user_at(&mut app, HOME);
    app.world_mut().write_message(RecenterRequest);

    for _ in 0..6 {
        app.update();
    }
    assert!(app.world().resource::<Observed>().regions.is_empty());

    for _ in 0..4 {
        app.update();
    }
    let regions = &app.world().resource::<Observed>().regions;
    assert_eq!(regions.len(), 1);
    assert!(regions[0].animated);
    assert_eq!(regions[0].region, Region::around(HOME, 1000.0, 1000.0));
    assert_eq!(
        app.world().resource::<MapView>().tracking_mode,
        UserTrackingMode::FollowWithHeading
    );
}

#[test]
fn test_recenter_without_location_does_nothing() {
    let mut app = test_app();
    app.world_mut().resource_mut::<MapView>().tracking_mode = UserTrackingMode::None;
    app.world_mut().write_message(RecenterRequest);

    for _ in 0..12 {
        app.update();
    }

    assert!(app.world().resource::<Observed>().regions.is_empty());
    assert_eq!(
        app.world().resource::<MapView>().tracking_mode,
        UserTrackingMode::None
    );
}

#[test]
fn test_hiding_user_location_cancels_pending_recenter() {
    let mut app = test_app();
    show_user_at(&mut app, HOME);
    app.world_mut().write_message(RecenterRequest);
    for _ in 0..3 {
        app.update();
    }

    app.world_mut().resource_mut::<MapView>().shows_user_location = false;
    for _ in 0..12 {
        app.update();
    }

    assert!(app.world().resource::<Observed>().regions.is_empty());
    assert_eq!(
        app.world().resource::<RecenterSchedule>().pending_count(),
        0
    );
    assert_eq!(
        app.world().resource::<MapView>().tracking_mode,
        UserTrackingMode::None
    );
}

/// Routes straight to the destination, one answer per opened gate
struct GatedDirections {
    gate: Mutex<mpsc::Receiver<()>>,
    answered: Mutex<mpsc::Sender<()>>,
}

impl DirectionsService for GatedDirections {
    fn calculate(&self, request: &DirectionsRequest) -> Result<Vec<Route>, DirectionsError> {
        let _ = self.gate.lock().unwrap().recv();
        let _ = self.answered.lock().unwrap().send(());
        Ok(vec![Route {
            polyline: vec![request.source, request.destination],
            distance_meters: 1800.0,
            expected_travel_time_secs: 200.0,
        }])
    }
}

struct Gate {
    open: mpsc::Sender<()>,
    answered: mpsc::Receiver<()>,
}

impl Gate {
    /// Let one route through and wait until its task has finished
    fn release_one(&self) {
        self.open.send(()).unwrap();
        self.answered
            .recv_timeout(Duration::from_secs(5))
            .expect("route task did not run");
        std::thread::sleep(Duration::from_millis(50));
    }
}

fn routed_app() -> (App, Gate) {
    let (open, gate) = mpsc::channel();
    let (answered_tx, answered) = mpsc::channel();
    let service = GatedDirections {
        gate: Mutex::new(gate),
        answered: Mutex::new(answered_tx),
    };

    let mut app = test_app();
    app.init_resource::<AppConfig>()
        .insert_resource(DirectionsClient(Arc::new(service)))
        .add_plugins(RoutingPlugin);
    show_user_at(&mut app, HOME);

    (app, Gate { open, answered })
}

fn run_until_settled(app: &mut App, count: usize) {
    for _ in 0..500 {
        app.update();
        if app.world().resource::<Observed>().settled.len() >= count {
            return;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    panic!("route requests did not settle");
}

fn overlays(app: &mut App) -> Vec<RouteOverlay> {
    let mut query = app.world_mut().query::<&RouteOverlay>();
    query.iter(app.world()).cloned().collect()
}

#[test]
fn test_selecting_another_pin_keeps_a_single_overlay() {
    let (mut app, gate) = routed_app();
    app.world_mut()
        .write_message(AnnotationSelected { coordinate: SHOP });
    app.update();

    // The first route finishes just as the user picks a different pin
    gate.release_one();
    app.world_mut()
        .write_message(AnnotationSelected { coordinate: PARK });
    app.update();

    gate.open.send(()).unwrap();
    run_until_settled(&mut app, 2);
    for _ in 0..3 {
        app.update();
    }

    let overlays = overlays(&mut app);
    assert_eq!(overlays.len(), 1);
    assert_eq!(overlays[0].polyline, vec![HOME, PARK]);
    assert_eq!(
        *app.world().resource::<InteractionPhase>(),
        InteractionPhase::Idle
    );
}

#[test]
fn test_clear_in_same_frame_as_route_completion_leaves_nothing() {
    let (mut app, gate) = routed_app();
    long_press(&mut app, Vec2::new(200.0, 400.0));
    app.world_mut()
        .write_message(AnnotationSelected { coordinate: SHOP });
    app.update();

    gate.release_one();
    app.world_mut().write_message(ClearAllRequest);
    app.update();

    assert_eq!(count::<RouteOverlay>(&mut app), 0);
    assert_eq!(count::<Pin>(&mut app), 0);

    for _ in 0..5 {
        app.update();
    }
    assert_eq!(count::<RouteOverlay>(&mut app), 0);
    assert_eq!(
        *app.world().resource::<InteractionPhase>(),
        InteractionPhase::Idle
    );
}
