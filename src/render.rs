//! Canvas 2D render step
//!
//! Drawing is a pure function of world state: nothing here mutates the
//! simulation. Colors and proportions follow the original web build.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::consts::MAGNET_RADIUS;
use crate::sim::World;

const COLOR_BACKGROUND: &str = "#050510";
const COLOR_PLAYER: &str = "#00ccff";
const COLOR_COCKPIT: &str = "#aaddff";
const COLOR_DEBRIS: &str = "#00ff88";
const COLOR_ENEMY: &str = "#ff3366";
const COLOR_POWERUP: &str = "#ffaa00";
const COLOR_FLAME: &str = "#ffaa00";

/// Draw the whole frame
pub fn render(ctx: &CanvasRenderingContext2d, world: &World) {
    let (w, h) = (world.bounds.x as f64, world.bounds.y as f64);
    ctx.clear_rect(0.0, 0.0, w, h);

    draw_background(ctx, w, h);

    for deb in &world.debris {
        if deb.collected {
            continue;
        }
        fill_circle(ctx, deb.pos.x as f64, deb.pos.y as f64, 6.0, COLOR_DEBRIS);
    }

    for powerup in &world.powerups {
        if !powerup.active {
            continue;
        }
        let (x, y) = (powerup.pos.x as f64, powerup.pos.y as f64);
        fill_circle(ctx, x, y, 10.0, COLOR_POWERUP);
        ctx.set_fill_style_str("#ffffff");
        ctx.set_font("bold 12px Arial");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        let _ = ctx.fill_text("\u{26a1}", x, y);
    }

    for enemy in &world.enemies {
        let (x, y) = (enemy.pos.x as f64, enemy.pos.y as f64);
        fill_circle(ctx, x, y, 12.5, COLOR_ENEMY);
        // Eyes
        ctx.set_fill_style_str("#ffffff");
        ctx.begin_path();
        let _ = ctx.arc(x - 6.25, y, 3.0, 0.0, PI * 2.0);
        let _ = ctx.arc(x + 6.25, y, 3.0, 0.0, PI * 2.0);
        ctx.fill();
    }

    draw_player(ctx, world);

    if world.magnet_active() {
        dashed_ring(
            ctx,
            world.player.pos.x as f64,
            world.player.pos.y as f64,
            MAGNET_RADIUS as f64,
            "rgba(0, 204, 255, 0.3)",
            2.0,
            &[5.0, 5.0],
        );
    }
    if world.shield_active() {
        dashed_ring(
            ctx,
            world.player.pos.x as f64,
            world.player.pos.y as f64,
            world.player.half_extent() as f64 + 5.0,
            "rgba(255, 0, 255, 0.5)",
            3.0,
            &[10.0, 5.0],
        );
    }
}

fn draw_background(ctx: &CanvasRenderingContext2d, w: f64, h: f64) {
    ctx.set_fill_style_str(COLOR_BACKGROUND);
    ctx.fill_rect(0.0, 0.0, w, h);

    // Deterministic star scatter
    ctx.set_fill_style_str("rgba(255, 255, 255, 0.8)");
    for i in 0..50u32 {
        let x = f64::from(i * 17) % w;
        let y = f64::from(i * 13) % h;
        ctx.fill_rect(x, y, 1.0, 1.0);
    }
}

fn draw_player(ctx: &CanvasRenderingContext2d, world: &World) {
    let player = &world.player;
    let (x, y) = (player.pos.x as f64, player.pos.y as f64);
    let size = player.size as f64;
    let half = size / 2.0;

    // Hull
    ctx.set_fill_style_str(COLOR_PLAYER);
    ctx.fill_rect(x - half, y - half, size, size);

    // Cockpit
    fill_circle(ctx, x, y, size / 3.0, COLOR_COCKPIT);

    // Engine flames while boosting
    if player.boosting {
        ctx.set_fill_style_str(COLOR_FLAME);
        ctx.fill_rect(x - half - 5.0, y - size / 4.0, 5.0, size / 2.0);
        ctx.fill_rect(x + half, y - size / 4.0, 5.0, size / 2.0);
    }
}

fn fill_circle(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, color: &str) {
    ctx.set_fill_style_str(color);
    ctx.begin_path();
    let _ = ctx.arc(x, y, radius, 0.0, PI * 2.0);
    ctx.fill();
}

fn dashed_ring(
    ctx: &CanvasRenderingContext2d,
    x: f64,
    y: f64,
    radius: f64,
    color: &str,
    width: f64,
    dash: &[f64],
) {
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(width);
    let pattern = js_sys::Array::new();
    for &seg in dash {
        pattern.push(&JsValue::from_f64(seg));
    }
    let _ = ctx.set_line_dash(&pattern);
    ctx.begin_path();
    let _ = ctx.arc(x, y, radius, 0.0, PI * 2.0);
    ctx.stroke();
    let _ = ctx.set_line_dash(&js_sys::Array::new());
}
