use sap_render::{
    run_app, Color, DrawCommand, FrameContext, Icon, Position, Rectangle, RenderConfig,
    RenderError, SapRenderer,
};

const VISUALIZER_BARS: usize = 32;
const TITLE_HEIGHT: i32 = 24;
const PADDING: i32 = 5;

const BORDER: Color = Color::rgba(25, 25, 25, 255);
const WINDOW_BG: Color = Color::rgba(50, 50, 50, 255);
const TITLE_BG: Color = Color::rgba(25, 25, 25, 255);
const TITLE_TEXT: Color = Color::rgba(240, 240, 240, 255);
const TEXT: Color = Color::rgba(230, 230, 230, 255);
const BUTTON: Color = Color::rgba(75, 75, 75, 255);
const BUTTON_HOVER: Color = Color::rgba(95, 95, 95, 255);
const BAR: Color = Color::rgba(90, 160, 230, 255);

static TRACKS: [&str; 6] = [
    "01 - Opening Theme.ogg",
    "02 - A Considerably Longer Track Name That Will Not Fit.ogg",
    "03 - Interlude.flac",
    "04 - Café Nocturne.mp3",
    "05 - Reprise.ogg",
    "06 - Closing.wav",
];

struct Scene {
    levels: [f32; VISUALIZER_BARS],
    selected: usize,
    shuffle: bool,
    frames: u64,
}

impl Scene {
    fn new() -> Self {
        Self {
            levels: [0.0; VISUALIZER_BARS],
            selected: 1,
            shuffle: true,
            frames: 0,
        }
    }

    fn update(&mut self, ctx: &FrameContext) {
        self.frames += 1;
        // Scroll the history left and append a synthetic level.
        self.levels.rotate_left(1);
        let t = ctx.elapsed;
        let level = 0.5 + 0.3 * (t * 3.1).sin() + 0.15 * (t * 7.3).sin();
        self.levels[VISUALIZER_BARS - 1] = level.clamp(0.0, 1.0);
    }
}

fn window_frame<'a>(
    commands: &mut Vec<DrawCommand<'a>>,
    title: &'a str,
    rect: Rectangle,
    closable: bool,
) -> Rectangle {
    commands.push(DrawCommand::Rect(
        Rectangle::new(rect.x - 1, rect.y - 1, rect.width + 2, rect.height + 2),
        BORDER,
    ));
    commands.push(DrawCommand::Rect(rect, WINDOW_BG));

    let title_rect = Rectangle::new(rect.x, rect.y, rect.width, TITLE_HEIGHT);
    commands.push(DrawCommand::Rect(title_rect, TITLE_BG));
    commands.push(DrawCommand::text(
        title,
        Position::new(rect.x + PADDING, rect.y + (TITLE_HEIGHT - 18) / 2),
        TITLE_TEXT,
    ));
    if closable {
        commands.push(DrawCommand::Icon(
            Icon::Close.id(),
            Rectangle::new(rect.right() - TITLE_HEIGHT, rect.y, TITLE_HEIGHT, TITLE_HEIGHT),
            TITLE_TEXT,
        ));
    }

    let body = Rectangle::new(
        rect.x,
        rect.y + TITLE_HEIGHT,
        rect.width,
        rect.height - TITLE_HEIGHT,
    );
    commands.push(DrawCommand::Clip(body));
    body
}

fn button<'a>(
    commands: &mut Vec<DrawCommand<'a>>,
    renderer: &SapRenderer,
    ctx: &FrameContext,
    label: &'a str,
    rect: Rectangle,
) {
    let hovered = ctx.mouse_position.is_some_and(|pos| rect.contains(pos));
    commands.push(DrawCommand::Rect(rect, if hovered { BUTTON_HOVER } else { BUTTON }));
    let label = renderer.fit_text(label, rect.width - 2 * PADDING);
    let width = renderer.measure_text_width(label);
    let height = renderer.measure_text_height();
    commands.push(DrawCommand::text(
        label,
        Position::new(rect.x + (rect.width - width) / 2, rect.y + (rect.height - height) / 2),
        TEXT,
    ));
}

fn draw_scene(
    scene: &mut Scene,
    renderer: &mut SapRenderer,
    ctx: &FrameContext,
) -> Result<(), RenderError> {
    scene.update(ctx);
    if scene.frames % 300 == 0 {
        let stats = renderer.stats();
        log::debug!(
            "frame {}: {} flushes, {} quads, {:.1} ms",
            scene.frames,
            stats.flushes,
            stats.quads,
            ctx.delta_time * 1000.0
        );
    }
    let screen = Rectangle::new(0, 0, ctx.size.0 as i32, ctx.size.1 as i32);
    let mut commands = Vec::new();

    // Visualizer
    let body = window_frame(
        &mut commands,
        "Visualizer",
        Rectangle::new(60, 60, VISUALIZER_BARS as i32 * 10, 200),
        true,
    );
    let bar_width = body.width / VISUALIZER_BARS as i32;
    for (i, level) in scene.levels.iter().enumerate() {
        let bar_height = (body.height as f32 * level) as i32;
        commands.push(DrawCommand::Rect(
            Rectangle::new(
                body.x + i as i32 * bar_width,
                body.bottom() - bar_height,
                bar_width,
                bar_height,
            ),
            BAR,
        ));
    }
    commands.push(DrawCommand::Clip(screen));

    // Player
    let body = window_frame(&mut commands, "Player", Rectangle::new(44, 325, 348, 115), false);
    let now_playing = renderer.fit_text(TRACKS[scene.selected], body.width - 2 * PADDING);
    let width = renderer.measure_text_width(now_playing);
    commands.push(DrawCommand::text(
        now_playing,
        Position::new(body.x + (body.width - width) / 2, body.y + PADDING),
        TEXT,
    ));
    let row = body.y + PADDING + 30;
    button(&mut commands, renderer, ctx, "<", Rectangle::new(body.x + PADDING, row, 86, 30));
    button(&mut commands, renderer, ctx, "||", Rectangle::new(body.x + 96, row, 140, 30));
    button(&mut commands, renderer, ctx, ">", Rectangle::new(body.x + 241, row, 100, 30));
    commands.push(DrawCommand::Clip(screen));

    // Queue
    let body = window_frame(&mut commands, "Queue", Rectangle::new(426, 266, 300, 200), false);
    for (i, &track) in TRACKS.iter().enumerate() {
        let rect = Rectangle::new(
            body.x + PADDING,
            body.y + PADDING + i as i32 * 24,
            body.width - 2 * PADDING,
            22,
        );
        if i == scene.selected {
            commands.push(DrawCommand::Rect(rect, BUTTON));
        }
        commands.push(DrawCommand::text(
            renderer.fit_text(track, rect.width),
            Position::new(rect.x + PADDING, rect.y + 2),
            TEXT,
        ));
    }
    let check = Rectangle::new(body.x + PADDING, body.bottom() - 26, 22, 22);
    commands.push(DrawCommand::Rect(check, BUTTON));
    if scene.shuffle {
        commands.push(DrawCommand::Icon(Icon::Check.id(), check, TEXT));
    }
    commands.push(DrawCommand::text(
        "Shuffle",
        Position::new(check.right() + PADDING, check.y + 2),
        TEXT,
    ));
    commands.push(DrawCommand::Clip(screen));

    // Settings
    let body = window_frame(
        &mut commands,
        "Settings",
        Rectangle::new(273, 490, 241, 168),
        false,
    );
    for (i, label) in ["Volume", "Vis R", "Vis G", "Vis B", "Vis A"].into_iter().enumerate() {
        let y = body.y + PADDING + i as i32 * 26;
        commands.push(DrawCommand::text(label, Position::new(body.x + PADDING, y + 2), TEXT));
        commands.push(DrawCommand::Rect(Rectangle::new(body.x + 80, y, 150, 22), BUTTON));
    }
    commands.push(DrawCommand::Icon(
        Icon::Expanded.id(),
        Rectangle::new(body.right() - 24, body.y, 24, 24),
        TEXT,
    ));
    commands.push(DrawCommand::Clip(screen));

    for command in commands {
        renderer.dispatch(command)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = RenderConfig::from_env()?;
    log::info!("starting demo with {:?}", config);

    let mut scene = Scene::new();
    run_app(config, move |renderer, ctx| draw_scene(&mut scene, renderer, ctx))?;
    Ok(())
}
