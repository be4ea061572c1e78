//! Several sessions on one hub end up with the same canvas.

use kurbo::Point;
use sketchwire_core::sync::MemoryTransport;
use sketchwire_core::{
    ConnectionState, DrawingSession, MemoryHub, PointerInput, Rgba, SessionConfig, Transport,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn join(hub: &MemoryHub, width: u32, height: u32) -> DrawingSession<MemoryTransport> {
    let config = SessionConfig::default().with_size(width, height);
    let mut session = DrawingSession::new(config, hub.connect());
    session.pump();
    session
}

fn stroke<T: Transport>(session: &mut DrawingSession<T>, points: &[(f64, f64)]) {
    let (x, y) = points[0];
    session.handle_input(PointerInput::Down { position: Point::new(x, y) });
    for &(x, y) in &points[1..] {
        session.handle_input(PointerInput::Move { position: Point::new(x, y) });
    }
    session.handle_input(PointerInput::Up);
}

#[test]
fn test_three_participants_converge() {
    init_logging();
    let hub = MemoryHub::new();
    let mut a = join(&hub, 120, 80);
    let mut b = join(&hub, 120, 80);
    let mut c = join(&hub, 120, 80);
    assert_eq!(hub.peer_count(), 3);

    a.pick_color(Rgba::rgb(0, 128, 255));
    stroke(&mut a, &[(10.0, 10.0), (110.0, 10.0), (110.0, 70.0)]);
    b.pump();
    c.pump();

    b.pick_size(3);
    stroke(&mut b, &[(10.0, 70.0), (60.0, 20.0)]);
    a.pump();
    c.pump();

    assert_eq!(a.surface().pixels(), b.surface().pixels());
    assert_eq!(b.surface().pixels(), c.surface().pixels());
    assert!(!c.surface().is_blank());
}

#[test]
fn test_interleaved_strokes_converge() {
    init_logging();
    let hub = MemoryHub::new();
    let mut a = join(&hub, 100, 100);
    let mut b = join(&hub, 100, 100);

    // Both participants draw at once; each pumps between its own moves
    a.handle_input(PointerInput::Down { position: Point::new(10.0, 10.0) });
    b.handle_input(PointerInput::Down { position: Point::new(90.0, 10.0) });
    for step in 1..=8 {
        let offset = f64::from(step) * 10.0;
        a.handle_input(PointerInput::Move { position: Point::new(10.0, 10.0 + offset) });
        b.handle_input(PointerInput::Move { position: Point::new(90.0, 10.0 + offset) });
        a.pump();
        b.pump();
    }
    a.handle_input(PointerInput::Up);
    b.handle_input(PointerInput::Up);
    a.pump();
    b.pump();

    assert_eq!(a.surface().pixels(), b.surface().pixels());
    assert_eq!(a.surface().pixel(10, 50), Some(Rgba::black()));
    assert_eq!(a.surface().pixel(90, 50), Some(Rgba::black()));
    assert_eq!(a.surface().pixel(50, 50), Some(Rgba::white()));
}

#[test]
fn test_eraser_strokes_converge() {
    init_logging();
    let hub = MemoryHub::new();
    let mut a = join(&hub, 60, 60);
    let mut b = join(&hub, 60, 60);

    stroke(&mut a, &[(5.0, 30.0), (55.0, 30.0)]);
    a.select_eraser();
    stroke(&mut a, &[(30.0, 5.0), (30.0, 55.0)]);
    b.pump();

    assert_eq!(a.surface().pixel(30, 30), Some(Rgba::white()));
    assert_eq!(a.surface().pixels(), b.surface().pixels());
}

#[test]
fn test_late_joiner_only_sees_new_events() {
    init_logging();
    let hub = MemoryHub::new();
    let mut a = join(&hub, 40, 40);
    stroke(&mut a, &[(5.0, 5.0), (35.0, 5.0)]);

    let mut b = join(&hub, 40, 40);
    assert!(b.surface().is_blank());

    stroke(&mut a, &[(5.0, 30.0), (35.0, 30.0)]);
    b.pump();
    assert_eq!(b.surface().pixel(20, 30), Some(Rgba::black()));
    assert_eq!(b.surface().pixel(20, 5), Some(Rgba::white()));
}

#[test]
fn test_disconnected_peer_keeps_drawing() {
    init_logging();
    let hub = MemoryHub::new();
    let mut a = join(&hub, 40, 40);
    let mut b = join(&hub, 40, 40);

    a.shutdown();
    a.pump();
    assert_eq!(a.connection_state(), ConnectionState::Closed);

    stroke(&mut a, &[(5.0, 20.0), (35.0, 20.0)]);
    assert_eq!(a.surface().pixel(20, 20), Some(Rgba::black()));
    assert_eq!(b.pump(), 0);
    assert!(b.surface().is_blank());
}
