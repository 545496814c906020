use macroquad::prelude::*;
use predprey::simulation::error::SimulationError;
use predprey::simulation::params::Params;
use predprey::simulation::snapshot::{Census, EntityColor, Sprite};

trait ToScreen {
    type Output;
    fn to_screen(&self, params: &Params) -> Self::Output;
}

impl ToScreen for (f32, f32) {
    type Output = (f32, f32);
    fn to_screen(&self, params: &Params) -> (f32, f32) {
        let scale_x = screen_width() / params.world_width;
        let scale_y = screen_height() / params.world_height;
        (self.0 * scale_x, self.1 * scale_y)
    }
}

impl ToScreen for f32 {
    type Output = f32;
    fn to_screen(&self, params: &Params) -> f32 {
        let scale_x = screen_width() / params.world_width;
        let scale_y = screen_height() / params.world_height;
        self * scale_x.min(scale_y)
    }
}

fn color_of(color: EntityColor) -> Color {
    match color {
        EntityColor::Red => RED,
        EntityColor::Green => GREEN,
        EntityColor::Yellow => YELLOW,
    }
}

pub fn draw_sprites(sprites: &[Sprite], params: &Params) {
    for sprite in sprites {
        let (x, y) = (sprite.x, sprite.y).to_screen(params);
        draw_circle(x, y, sprite.radius.to_screen(params), color_of(sprite.color));
    }
}

/// Message shown at the bottom of the screen, if any. A halted simulation
/// takes precedence over a paused one.
fn status_banner(running: bool, fault: Option<&SimulationError>) -> Option<String> {
    match fault {
        Some(err) => Some(format!("Simulation halted: {err}")),
        None if !running => Some("Paused (Space to resume)".to_owned()),
        None => None,
    }
}

pub fn draw_census(census: &Census, running: bool, fault: Option<&SimulationError>) {
    let font_size = 24.0;
    let lines = [
        format!("Generation: {}", census.generation),
        format!("Prey: {}", census.prey),
        format!("Predators: {}", census.predators),
        format!("Longest life: {}", census.max_time_alive),
    ];
    for (i, line) in lines.iter().enumerate() {
        draw_text(line, 10.0, 24.0 + i as f32 * font_size, font_size, WHITE);
    }

    if let Some(text) = status_banner(running, fault) {
        let color = if fault.is_some() { RED } else { LIGHTGRAY };
        let size = measure_text(&text, None, font_size as u16, 1.0);
        draw_text(
            &text,
            screen_width() / 2. - size.width / 2.,
            screen_height() - size.height,
            font_size,
            color,
        );
    }
}

pub fn draw_genesis_screen() {
    clear_background(LIGHTGRAY);
    let text = "Start a new simulation by pressing Enter";
    let font_size = 30.0;

    let text_size = measure_text(text, None, font_size as _, 1.0);
    draw_text(
        text,
        screen_width() / 2. - text_size.width / 2.,
        screen_height() / 2. - text_size.height / 2.,
        font_size,
        DARKGRAY,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use predprey::simulation::agent::AgentId;

    #[test]
    fn banner_only_when_paused_or_halted() {
        assert_eq!(status_banner(true, None), None);
        assert_eq!(
            status_banner(false, None).as_deref(),
            Some("Paused (Space to resume)")
        );
    }

    #[test]
    fn halted_banner_names_the_error() {
        let err = SimulationError::DoubleKill(AgentId(7));
        for running in [true, false] {
            let banner = status_banner(running, Some(&err)).unwrap();
            assert_eq!(banner, "Simulation halted: agent #7 was already removed");
        }
    }
}
