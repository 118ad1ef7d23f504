// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Integration tests for route drawing and map click routing.

mod common;

use common::{add_ride, add_run, test_app, HOME};
use mapty_tracker::db::KvStore;
use mapty_tracker::models::{Coords, PathLine};
use mapty_tracker::services::{FormMode, MapClick, PathDrawingSession};

const A_ORIGIN: Coords = Coords {
    lat: 40.0,
    lng: -3.0,
};
const B_ORIGIN: Coords = Coords {
    lat: 41.0,
    lng: -4.0,
};

#[test]
fn test_map_click_opens_form_when_not_drawing() {
    let (mut app, mut session) = test_app();

    let routed = app.handle_map_click(&mut session, HOME);

    assert_eq!(routed, MapClick::FormOpened);
    assert_eq!(session.form(), &FormMode::Composing { at: HOME });
}

#[test]
fn test_clicks_while_drawing_extend_route() {
    let (mut app, mut session) = test_app();
    let run = add_run(&mut app, &mut session, A_ORIGIN, 5.0, 25.0, 150.0);
    let p1 = Coords::new(40.01, -3.01);
    let p2 = Coords::new(40.02, -3.03);

    app.start_drawing(&mut session, run.id()).unwrap();
    app.map_mut().clear_calls();

    assert_eq!(app.handle_map_click(&mut session, p1), MapClick::Drawn);
    assert_eq!(app.handle_map_click(&mut session, p2), MapClick::Drawn);

    assert_eq!(app.map().polylines(), vec![vec![A_ORIGIN, p1]]);
    assert_eq!(app.map().extensions(), vec![p2]);
    assert_eq!(session.form(), &FormMode::Idle);
    assert_eq!(session.drawing().unsaved_path().unwrap().points(), &[p1, p2]);
}

#[test]
fn test_save_path_anchors_origin_and_returns_clicks_to_form() {
    let (mut app, mut session) = test_app();
    let run = add_run(&mut app, &mut session, A_ORIGIN, 5.0, 25.0, 150.0);
    let p1 = Coords::new(40.01, -3.01);

    app.start_drawing(&mut session, run.id()).unwrap();
    app.handle_map_click(&mut session, p1);
    let saved = app.save_path(&mut session).unwrap().unwrap();

    assert_eq!(saved.points(), &[A_ORIGIN, p1]);
    assert_eq!(app.db().load_path(run.id()).unwrap(), Some(saved));
    assert!(!session.drawing().is_recording());
    assert_eq!(
        app.handle_map_click(&mut session, HOME),
        MapClick::FormOpened
    );
}

#[test]
fn test_switching_workouts_discards_unsaved_points() {
    let (mut app, mut session) = test_app();
    let a = add_run(&mut app, &mut session, A_ORIGIN, 5.0, 25.0, 150.0);
    let b = add_ride(&mut app, &mut session, B_ORIGIN, 20.0, 60.0, 300.0);

    // A already has a saved route
    let saved_point = Coords::new(40.05, -3.05);
    app.start_drawing(&mut session, a.id()).unwrap();
    app.handle_map_click(&mut session, saved_point);
    app.save_path(&mut session).unwrap();

    // Two unsaved clicks for A, then switch to B
    app.start_drawing(&mut session, a.id()).unwrap();
    app.handle_map_click(&mut session, Coords::new(40.1, -3.1));
    app.handle_map_click(&mut session, Coords::new(40.2, -3.2));
    app.start_drawing(&mut session, b.id()).unwrap();

    assert_eq!(session.drawing().active_workout(), Some(b.id()));
    assert!(session.drawing().unsaved_path().unwrap().is_empty());
    assert_eq!(
        app.db().load_path(a.id()).unwrap().unwrap().points(),
        &[A_ORIGIN, saved_point]
    );

    // The next click belongs to B
    let p = Coords::new(41.1, -4.1);
    assert_eq!(app.handle_map_click(&mut session, p), MapClick::Drawn);
    assert_eq!(session.drawing().unsaved_path().unwrap().points(), &[p]);
}

#[test]
fn test_stale_ticket_is_ignored() {
    let (mut app, mut session) = test_app();
    let a = add_run(&mut app, &mut session, A_ORIGIN, 5.0, 25.0, 150.0);
    let b = add_ride(&mut app, &mut session, B_ORIGIN, 20.0, 60.0, 300.0);

    let stale = app.start_drawing(&mut session, a.id()).unwrap();
    let current = app.start_drawing(&mut session, b.id()).unwrap();
    assert_eq!(current.workout_id(), b.id());

    assert!(!app.draw_click(&mut session, &stale, Coords::new(40.1, -3.1)));
    assert!(session.drawing().unsaved_path().unwrap().is_empty());
    assert!(app.draw_click(&mut session, &current, Coords::new(41.1, -4.1)));
}

#[test]
fn test_save_without_clicks_keeps_saved_route() {
    let (mut app, mut session) = test_app();
    let run = add_run(&mut app, &mut session, A_ORIGIN, 5.0, 25.0, 150.0);
    let existing = PathLine::from_points(run.id(), vec![A_ORIGIN, Coords::new(40.3, -3.3)]);
    app.db().save_path(&existing).unwrap();

    app.start_drawing(&mut session, run.id()).unwrap();
    assert_eq!(app.save_path(&mut session).unwrap(), None);

    assert_eq!(app.db().load_path(run.id()).unwrap(), Some(existing));
}

#[test]
fn test_select_draws_saved_route() {
    let (mut app, mut session) = test_app();
    let run = add_run(&mut app, &mut session, A_ORIGIN, 5.0, 25.0, 150.0);
    let end = Coords::new(40.3, -3.3);
    app.db()
        .save_path(&PathLine::from_points(run.id(), vec![end]))
        .unwrap();
    app.map_mut().clear_calls();

    let path = app.select(&mut session, run.id()).unwrap();

    assert_eq!(path.points(), &[A_ORIGIN, end]);
    assert_eq!(app.map().polylines(), vec![vec![A_ORIGIN, end]]);
}

#[test]
fn test_unreadable_saved_route_falls_back_to_origin() {
    let (mut app, mut session) = test_app();
    let run = add_run(&mut app, &mut session, A_ORIGIN, 5.0, 25.0, 150.0);
    app.db()
        .kv()
        .set(&format!("path-{}", run.id()), "not json")
        .unwrap();

    let path = PathDrawingSession::load_saved(app.db(), run.id(), A_ORIGIN);
    assert_eq!(path.points(), &[A_ORIGIN]);
    assert!(app.select(&mut session, run.id()).is_some());
}

#[test]
fn test_drawing_unknown_workout_is_ignored() {
    let (mut app, mut session) = test_app();

    assert!(app.start_drawing(&mut session, "0000000000").is_none());
    assert!(!session.drawing().is_recording());
    assert_eq!(
        app.handle_map_click(&mut session, HOME),
        MapClick::FormOpened
    );
}

#[test]
fn test_route_length_of_saved_path() {
    let (mut app, mut session) = test_app();
    let run = add_run(&mut app, &mut session, A_ORIGIN, 5.0, 25.0, 150.0);

    app.start_drawing(&mut session, run.id()).unwrap();
    app.handle_map_click(&mut session, Coords::new(40.0, -2.99));
    let saved = app.save_path(&mut session).unwrap().unwrap();

    // 0.01 degrees of longitude at 40N is about 852 m
    let km = saved.length_km();
    assert!((km - 0.852).abs() < 0.01, "unexpected length {}", km);
}

#[test]
fn test_switching_workouts_erases_unsaved_trail() {
    let (mut app, mut session) = test_app();
    let a = add_run(&mut app, &mut session, A_ORIGIN, 5.0, 25.0, 150.0);
    let b = add_ride(&mut app, &mut session, B_ORIGIN, 20.0, 60.0, 300.0);

    app.start_drawing(&mut session, a.id()).unwrap();
    app.handle_map_click(&mut session, Coords::new(40.1, -3.1));
    app.handle_map_click(&mut session, Coords::new(40.2, -3.2));
    assert_eq!(app.map().live_polylines().len(), 1);
    assert_eq!(app.map().path_end_markers(), vec![Coords::new(40.2, -3.2)]);

    app.start_drawing(&mut session, b.id()).unwrap();

    assert!(app.map().live_polylines().is_empty());
    assert!(app.map().path_end_markers().is_empty());
}

#[test]
fn test_saved_route_replaces_trail() {
    let (mut app, mut session) = test_app();
    let run = add_run(&mut app, &mut session, A_ORIGIN, 5.0, 25.0, 150.0);
    let p1 = Coords::new(40.01, -3.01);
    let p2 = Coords::new(40.02, -3.03);

    app.start_drawing(&mut session, run.id()).unwrap();
    app.handle_map_click(&mut session, p1);
    app.handle_map_click(&mut session, p2);
    app.save_path(&mut session).unwrap();

    assert_eq!(app.map().live_polylines(), vec![vec![A_ORIGIN, p1, p2]]);
    assert_eq!(app.map().path_end_markers(), vec![p2]);
    assert_eq!(session.shown_route(), Some(run.id()));
}

#[test]
fn test_repeated_select_shows_route_once() {
    let (mut app, mut session) = test_app();
    let a = add_run(&mut app, &mut session, A_ORIGIN, 5.0, 25.0, 150.0);
    let b = add_ride(&mut app, &mut session, B_ORIGIN, 20.0, 60.0, 300.0);
    let a_end = Coords::new(40.3, -3.3);
    let b_end = Coords::new(41.3, -4.3);
    app.db()
        .save_path(&PathLine::from_points(a.id(), vec![a_end]))
        .unwrap();
    app.db()
        .save_path(&PathLine::from_points(b.id(), vec![B_ORIGIN, b_end]))
        .unwrap();

    for _ in 0..3 {
        app.select(&mut session, a.id()).unwrap();
    }
    assert_eq!(app.map().live_polylines(), vec![vec![A_ORIGIN, a_end]]);
    assert_eq!(app.map().path_end_markers(), vec![a_end]);

    app.select(&mut session, b.id()).unwrap();
    assert_eq!(app.map().live_polylines(), vec![vec![B_ORIGIN, b_end]]);
    assert_eq!(app.map().path_end_markers(), vec![b_end]);
}

#[test]
fn test_route_overlays_go_with_their_workout() {
    let (mut app, mut session) = test_app();
    let a = add_run(&mut app, &mut session, A_ORIGIN, 5.0, 25.0, 150.0);
    let b = add_ride(&mut app, &mut session, B_ORIGIN, 20.0, 60.0, 300.0);
    app.db()
        .save_path(&PathLine::from_points(a.id(), vec![Coords::new(40.3, -3.3)]))
        .unwrap();

    // Deleting the workout whose route is shown takes the route away
    app.select(&mut session, a.id()).unwrap();
    assert!(app.delete(&mut session, a.id()).unwrap());
    assert!(app.map().live_polylines().is_empty());
    assert_eq!(session.shown_route(), None);

    // Cancel erases a trail in progress
    app.start_drawing(&mut session, b.id()).unwrap();
    app.handle_map_click(&mut session, Coords::new(41.1, -4.1));
    app.cancel(&mut session);
    assert!(app.map().live_polylines().is_empty());
    assert!(app.map().path_end_markers().is_empty());

    // Delete-all erases the shown route
    app.start_drawing(&mut session, b.id()).unwrap();
    app.handle_map_click(&mut session, Coords::new(41.1, -4.1));
    app.save_path(&mut session).unwrap();
    assert_eq!(app.map().live_polylines().len(), 1);
    app.delete_all(&mut session).unwrap();
    assert!(app.map().live_polylines().is_empty());
    assert!(app.map().path_end_markers().is_empty());
}

#[test]
fn test_map_click_while_editing_is_ignored() {
    let (mut app, mut session) = test_app();
    let run = add_run(&mut app, &mut session, A_ORIGIN, 5.0, 25.0, 150.0);

    app.request_edit(&mut session, run.id()).unwrap();

    assert_eq!(app.handle_map_click(&mut session, HOME), MapClick::Ignored);
    assert_eq!(
        session.form(),
        &FormMode::Editing {
            id: run.id().to_string()
        }
    );
}
