//! The map surface: view state, camera, gestures, annotations and rendering.

mod annotations;
mod camera;
mod gestures;
mod rendering;
mod view;


pub use annotations::{Pin, RouteOverlay};
pub use view::{MapStyle, MapView, UserTrackingMode};

use bevy::prelude::*;

use crate::config::{AppConfig, ConfigLoaded};
use crate::constants::DEFAULT_REGION_SPAN_METERS;
use crate::geo::{Coordinate, MapProjection, Region};
use crate::ui::no_dialog_open;

use gestures::{PointerOverUi, PressTracker};

/// A long press started at a screen point
#[derive(Message, Debug, Clone, Copy)]
pub struct LongPressBegan {
    pub screen_point: Vec2,
}

/// The user tapped an annotation
#[derive(Message, Debug, Clone, Copy)]
pub struct AnnotationSelected {
    pub coordinate: Coordinate,
}

/// Change the visible region
#[derive(Message, Debug, Clone, Copy)]
pub struct SetRegion {
    pub region: Region,
    pub animated: bool,
}

/// Anchor the projection and the initial region at the configured location
fn init_map_view(
    config: Res<AppConfig>,
    mut projection: ResMut<MapProjection>,
    mut map_view: ResMut<MapView>,
) {
    let origin = Coordinate::new(
        config.data.location.latitude,
        config.data.location.longitude,
    );
    *projection = MapProjection::new(origin);
    map_view.style = config.data.map_style;
    map_view.region = Region::around(
        origin,
        DEFAULT_REGION_SPAN_METERS,
        DEFAULT_REGION_SPAN_METERS,
    );
    info!("Map anchored at {} ({:?} style)", origin, map_view.style);
}

pub struct MapPlugin;

impl Plugin for MapPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MapView>()
            .init_resource::<MapProjection>()
            .init_resource::<PressTracker>()
            .init_resource::<PointerOverUi>()
            .add_message::<LongPressBegan>()
            .add_message::<AnnotationSelected>()
            .add_message::<SetRegion>()
            .init_gizmo_group::<rendering::RouteGizmoGroup>()
            .add_systems(
                Startup,
                (
                    camera::spawn_camera,
                    rendering::configure_route_gizmos,
                    init_map_view.after(ConfigLoaded),
                ),
            )
            .add_systems(
                Update,
                (
                    camera::update_viewport_size,
                    gestures::track_pointer_over_ui,
                    gestures::handle_map_gestures.run_if(no_dialog_open),
                    gestures::handle_map_zoom.run_if(no_dialog_open),
                    camera::apply_set_region,
                    camera::follow_user_location,
                    camera::animate_region,
                    camera::sync_camera,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    rendering::apply_map_style,
                    rendering::draw_basemap,
                    rendering::draw_route_overlays,
                    rendering::draw_pins,
                    rendering::draw_user_location,
                )
                    .after(camera::sync_camera),
            );
    }
}
