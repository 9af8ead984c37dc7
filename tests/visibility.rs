use crosshair_overlay::geometry::Point;
use crosshair_overlay::visibility::{apply_visibility, OFFSCREEN_POS};
use eframe::egui;

use mock_ctx::MockCtx;

#[test]
fn hide_moves_window_offscreen() {
    let ctx = MockCtx::default();
    apply_visibility(false, &ctx, Point::new(10, 10), OFFSCREEN_POS);
    let cmds = ctx.commands.lock().unwrap();
    assert_eq!(cmds.len(), 2); // OuterPosition + Visible(true)
    match cmds[0] {
        egui::ViewportCommand::OuterPosition(pos) => {
            assert_eq!(pos.x, OFFSCREEN_POS.0);
            assert_eq!(pos.y, OFFSCREEN_POS.1);
        }
        _ => panic!("unexpected command"),
    }
    match cmds[1] {
        egui::ViewportCommand::Visible(v) => assert!(v),
        _ => panic!("unexpected command"),
    }
}

#[test]
fn show_moves_to_position_and_restores() {
    let ctx = MockCtx::default();
    apply_visibility(true, &ctx, Point::new(300, 360), OFFSCREEN_POS);
    let cmds = ctx.commands.lock().unwrap();
    assert_eq!(cmds.len(), 3);
    match cmds[0] {
        egui::ViewportCommand::OuterPosition(pos) => assert_eq!(pos, egui::pos2(300.0, 360.0)),
        _ => panic!("unexpected command"),
    }
    match cmds[2] {
        egui::ViewportCommand::Minimized(m) => assert!(!m),
        _ => panic!("unexpected command"),
    }
}

#[test]
fn custom_offscreen_position_is_honoured() {
    let ctx = MockCtx::default();
    apply_visibility(false, &ctx, Point::default(), (-5000.0, -4000.0));
    assert_eq!(ctx.last_position(), Some(egui::pos2(-5000.0, -4000.0)));
}
