use bevy::prelude::*;
use bevy::window::WindowResized;

use gauntlet::render::{handle_resize, SurfaceSize};
use gauntlet::timeline::ScrollLayout;

#[test]
fn window_resize_reaches_camera_surface_and_page() {
    let mut app = App::new();
    app.add_event::<WindowResized>()
        .init_resource::<SurfaceSize>()
        .init_resource::<ScrollLayout>()
        .add_systems(Update, handle_resize);
    let camera = app
        .world_mut()
        .spawn((
            Camera3d::default(),
            Projection::Perspective(PerspectiveProjection::default()),
        ))
        .id();

    for (width, height) in [(640.0, 480.0), (1024.0, 768.0)] {
        app.world_mut().send_event(WindowResized {
            window: Entity::PLACEHOLDER,
            width,
            height,
        });
    }
    app.update();

    let Some(Projection::Perspective(perspective)) = app.world().get::<Projection>(camera) else {
        panic!("camera lost its perspective projection");
    };
    assert!((perspective.aspect_ratio - 1024.0 / 768.0).abs() < 1e-6);
    assert_eq!(
        *app.world().resource::<SurfaceSize>(),
        SurfaceSize { width: 1024.0, height: 768.0 }
    );
    assert_eq!(app.world().resource::<ScrollLayout>().viewport_height, 768.0);
}
