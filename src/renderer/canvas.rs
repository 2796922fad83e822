//! Canvas 2D surface

use std::cell::Cell;
use std::f64::consts::TAU;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{Frame, Shape, Surface, css_color};

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    sprite: HtmlImageElement,
    sprite_loaded: Rc<Cell<bool>>,
}

impl CanvasSurface {
    /// Wrap a canvas and start loading the character image from `sprite_url`
    pub fn new(canvas: &HtmlCanvasElement, sprite_url: &str) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;

        let sprite = HtmlImageElement::new()?;
        let sprite_loaded = Rc::new(Cell::new(false));
        {
            let loaded = sprite_loaded.clone();
            let onload = Closure::<dyn FnMut()>::new(move || loaded.set(true));
            sprite.set_onload(Some(onload.as_ref().unchecked_ref()));
            onload.forget();
        }
        {
            let url = sprite_url.to_string();
            let onerror = Closure::<dyn FnMut()>::new(move || {
                log::warn!("Failed to load {} - drawing default character", url);
            });
            sprite.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onerror.forget();
        }
        sprite.set_src(sprite_url);

        Ok(Self {
            ctx,
            sprite,
            sprite_loaded,
        })
    }
}

impl Surface for CanvasSurface {
    fn sprite_ready(&self) -> bool {
        self.sprite_loaded.get()
    }

    fn present(&mut self, frame: &Frame) {
        let ctx = &self.ctx;
        for shape in &frame.shapes {
            match shape {
                Shape::Rect { pos, size, color } => {
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
                }
                Shape::Circle {
                    center,
                    radius,
                    color,
                } => {
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.begin_path();
                    let _ = ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU);
                    ctx.fill();
                }
                Shape::Triangle { points, color } => {
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.begin_path();
                    ctx.move_to(points[0].x as f64, points[0].y as f64);
                    ctx.line_to(points[1].x as f64, points[1].y as f64);
                    ctx.line_to(points[2].x as f64, points[2].y as f64);
                    ctx.fill();
                }
                Shape::Sprite { pos, size } => {
                    if let Err(e) = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        &self.sprite,
                        pos.x as f64,
                        pos.y as f64,
                        size.x as f64,
                        size.y as f64,
                    ) {
                        log::warn!("Sprite draw failed: {:?}", e);
                    }
                }
            }
        }
    }
}
