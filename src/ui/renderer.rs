/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Everything is drawn on a fixed CANVAS_W × CANVAS_H canvas centred in
/// the terminal. The renderer only reads a `Snapshot`; it never touches
/// the controller.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::classifier::{ElementKind, Verdict};
use crate::domain::inventory::{ItemRole, Region};
use crate::sim::content;
use crate::sim::layout::{self, CANVAS_H, CANVAS_W, DETAIL};
use crate::sim::session::Phase;
use crate::sim::snapshot::{Snapshot, Tone};

// ── Palette ──

const BASE_BG: Color = Color::Rgb { r: 18, g: 20, b: 30 };
const DESK_BG: Color = Color::Rgb { r: 52, g: 36, b: 24 };
const PANEL_BG: Color = Color::Rgb { r: 28, g: 32, b: 48 };
const TEXT: Color = Color::Rgb { r: 220, g: 220, b: 230 };
const DIM: Color = Color::Rgb { r: 120, g: 120, b: 140 };
const ACCENT: Color = Color::Rgb { r: 90, g: 200, b: 255 };
const GOOD: Color = Color::Rgb { r: 90, g: 220, b: 120 };
const WARN: Color = Color::Rgb { r: 255, g: 200, b: 60 };
const BAD: Color = Color::Rgb { r: 255, g: 80, b: 80 };
const NOTE: Color = Color::Rgb { r: 250, g: 230, b: 90 };

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: TEXT, bg: BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }
}

/// Canvas-space drawing on top of a FrameBuffer. Anything outside the
/// canvas or the terminal is clipped.
struct Canvas<'a> {
    buf: &'a mut FrameBuffer,
    ox: i32,
    oy: i32,
}

impl Canvas<'_> {
    fn set(&mut self, x: i32, y: i32, ch: char, fg: Color, bg: Color) {
        if x < 0 || y < 0 || x >= CANVAS_W || y >= CANVAS_H { return; }
        let (tx, ty) = (x + self.ox, y + self.oy);
        if tx < 0 || ty < 0 { return; }
        let (tx, ty) = (tx as usize, ty as usize);
        if tx < self.buf.width && ty < self.buf.height {
            self.buf.cells[ty * self.buf.width + tx] = Cell { ch, fg, bg };
        }
    }

    fn text(&mut self, x: i32, y: i32, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg, bg);
        }
    }

    /// Text clipped to `max` columns.
    fn text_clip(&mut self, x: i32, y: i32, s: &str, max: usize, fg: Color, bg: Color) {
        let clipped: String = s.chars().take(max).collect();
        self.text(x, y, &clipped, fg, bg);
    }

    fn centered(&mut self, y: i32, s: &str, fg: Color, bg: Color) {
        let x = (CANVAS_W - s.chars().count() as i32) / 2;
        self.text(x, y, s, fg, bg);
    }

    fn fill(&mut self, r: Region, bg: Color) {
        for y in r.y..r.y + r.h {
            for x in r.x..r.x + r.w {
                self.set(x, y, ' ', TEXT, bg);
            }
        }
    }

    fn frame(&mut self, r: Region, fg: Color, bg: Color) {
        self.fill(r, bg);
        if r.w < 2 || r.h < 2 {
            return;
        }
        let (x1, y1) = (r.x + r.w - 1, r.y + r.h - 1);
        for x in r.x + 1..x1 {
            self.set(x, r.y, '─', fg, bg);
            self.set(x, y1, '─', fg, bg);
        }
        for y in r.y + 1..y1 {
            self.set(r.x, y, '│', fg, bg);
            self.set(x1, y, '│', fg, bg);
        }
        self.set(r.x, r.y, '┌', fg, bg);
        self.set(x1, r.y, '┐', fg, bg);
        self.set(r.x, y1, '└', fg, bg);
        self.set(x1, y1, '┘', fg, bg);
    }

    fn hline(&mut self, y: i32, fg: Color) {
        for x in 0..CANVAS_W {
            self.set(x, y, '─', fg, BASE_BG);
        }
    }
}

/// Greedy word wrap. Words longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let mut word = word.to_string();
        while word.chars().count() > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let head: String = word.chars().take(width).collect();
            word = word.chars().skip(width).collect();
            lines.push(head);
        }
        let needed = if line.is_empty() { word.len() } else { line.len() + 1 + word.len() };
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// `mm:ss`
pub fn fmt_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Top-left terminal cell of a canvas centred in a `term_w × term_h` terminal.
fn canvas_origin(term_w: usize, term_h: usize) -> (i32, i32) {
    (
        ((term_w as i32 - CANVAS_W) / 2).max(0),
        ((term_h as i32 - CANVAS_H) / 2).max(0),
    )
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Info => TEXT,
        Tone::Success => GOOD,
        Tone::Warning => WARN,
        Tone::Penalty => BAD,
    }
}

// ── Renderer ──

const HUD_ROW: i32 = 0;
const FEEDBACK_ROW: i32 = 28;
const HINT_ROW: i32 = 30;
const HELP_ROW: i32 = 31;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((CANVAS_W as u16, CANVAS_H as u16));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Map a terminal cell to canvas coordinates. `None` outside the canvas.
    pub fn canvas_point(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        let (ox, oy) = canvas_origin(self.term_w, self.term_h);
        let (x, y) = (col as i32 - ox, row as i32 - oy);
        (x >= 0 && y >= 0 && x < CANVAS_W && y < CANVAS_H).then_some((x, y))
    }

    pub fn render(&mut self, snap: &Snapshot, pointer: Option<(i32, i32)>) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((CANVAS_W as u16, CANVAS_H as u16));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(BASE_BG), Clear(ClearType::All))?;
        }

        // Phase change → clear for a clean transition
        if self.last_phase != Some(snap.phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(snap.phase);
        }

        self.front.clear();
        let (ox, oy) = canvas_origin(self.term_w, self.term_h);
        let mut c = Canvas { buf: &mut self.front, ox, oy };

        compose_hud(&mut c, snap);
        match snap.phase {
            Phase::Intro { .. } | Phase::Level2Intro { .. } => compose_dialogue(&mut c, snap),
            Phase::DeskSearch => compose_desk(&mut c, snap),
            Phase::LaptopLogin => {
                compose_desk(&mut c, snap);
                compose_login(&mut c, snap);
            }
            Phase::LevelSelect => compose_map(&mut c, snap),
            Phase::Level2Phishing => compose_inbox(&mut c, snap),
            Phase::Level2Quiz => compose_quiz(&mut c, snap),
            Phase::LevelComplete | Phase::Level2Complete | Phase::MissionFailed { .. } => {
                compose_result(&mut c, snap)
            }
        }
        compose_footer(&mut c, snap);

        if let Some((px, py)) = pointer {
            c.set(px, py, '✛', BASE_BG, ACCENT);
        }

        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = TEXT;
        let mut last_bg = BASE_BG;
        let mut need_move = true;

        queue!(self.writer, SetForegroundColor(TEXT), SetBackgroundColor(BASE_BG))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }
                if need_move {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
            }
            need_move = true;
        }

        self.writer.flush()
    }
}

// ── Compose: build front buffer content ──

fn level_name(level: Option<u8>) -> &'static str {
    match level {
        Some(1) => content::LEVEL_PINS[0].name,
        Some(2) => content::LEVEL_PINS[1].name,
        _ => "City Map",
    }
}

fn compose_hud(c: &mut Canvas, s: &Snapshot) {
    let level = s.phase.level();
    c.text(1, HUD_ROW, "CYBER DETECTIVE", ACCENT, BASE_BG);
    c.text(18, HUD_ROW, level_name(level), TEXT, BASE_BG);

    if let Some(t) = s.timer {
        let color = if !t.running {
            DIM
        } else if t.remaining_secs <= 10 {
            BAD
        } else if t.remaining_secs <= 30 {
            WARN
        } else {
            GOOD
        };
        c.text(38, HUD_ROW, &format!("TIME {}/{}", fmt_clock(t.remaining_secs), fmt_clock(t.limit_secs)), color, BASE_BG);
    }
    match level {
        Some(1) => {
            let key = if s.desk.has_key { "  KEY ✓" } else { "" };
            c.text(56, HUD_ROW, &format!("Found {}/{}{}", s.desk.found, s.desk.total, key), TEXT, BASE_BG);
        }
        Some(_) => {
            let total = s.inbox.emails.len();
            c.text(56, HUD_ROW, &format!("Classified {}/{}", s.inbox.classified, total), TEXT, BASE_BG);
        }
        None => {}
    }
    if let Some(h) = s.hints {
        c.text(84, HUD_ROW, &format!("Hints {}/{}", h.remaining, h.max), DIM, BASE_BG);
    }
    c.hline(HUD_ROW + 1, DIM);
}

fn compose_footer(c: &mut Canvas, s: &Snapshot) {
    c.hline(FEEDBACK_ROW - 1, DIM);
    if let Some(fb) = s.feedback.as_ref().filter(|f| f.visible(s.now, s.feedback_ms)) {
        for (i, line) in wrap(&fb.text, (CANVAS_W - 4) as usize).iter().take(2).enumerate() {
            c.text(2, FEEDBACK_ROW + i as i32, line, tone_color(fb.tone), BASE_BG);
        }
    }
    if let Some(last) = s.hints.and_then(|h| h.last) {
        c.text_clip(2, HINT_ROW, &format!("Hint: {last}"), (CANVAS_W - 4) as usize, WARN, BASE_BG);
    }
    let help = match s.phase {
        Phase::Intro { .. } | Phase::Level2Intro { .. } => "[Enter/Click] Continue",
        Phase::DeskSearch if s.tutorial.is_some() => "[Enter/Click] Continue",
        Phase::DeskSearch => "[Click] Investigate   [Tab] Hint",
        Phase::LaptopLogin => "[Type] Password   [Enter] Submit   [Esc] Back to desk",
        Phase::LevelSelect => "[1-5/Click] Select   [Enter] Start   [Esc] Quit",
        Phase::Level2Phishing => "[Click] Open/Inspect   [P] Phishing   [S] Safe   [Tab] Hint   [Esc] Close",
        Phase::Level2Quiz => "[A-D] Answer   [Enter] Next",
        Phase::LevelComplete | Phase::Level2Complete => "[Enter] City map",
        Phase::MissionFailed { .. } => "[R] Retry   [Q/Esc] Quit",
    };
    c.centered(HELP_ROW, help, DIM, BASE_BG);
}

fn compose_dialogue(c: &mut Canvas, s: &Snapshot) {
    let Some(d) = s.dialogue else { return };
    let title = match s.phase {
        Phase::Level2Intro { .. } => "INCOMING TRANSMISSION: LEVEL 2",
        _ => "INCOMING TRANSMISSION: LEVEL 1",
    };
    c.centered(6, title, ACCENT, BASE_BG);
    let panel = Region::new(10, 10, 80, 9);
    c.frame(panel, ACCENT, PANEL_BG);
    for (i, line) in wrap(d.text, 72).iter().enumerate().take(5) {
        c.text(14, 12 + i as i32, line, TEXT, PANEL_BG);
    }
    c.text(74, 17, &format!("{}/{}", d.index + 1, d.total), DIM, PANEL_BG);
}

fn compose_desk(c: &mut Canvas, s: &Snapshot) {
    c.fill(Region::new(0, 3, CANVAS_W, 24), DESK_BG);
    for item in s.desk.items.iter().filter(|i| i.visible) {
        let r = item.region;
        let (fg, bg) = match item.role {
            ItemRole::Entry => (ACCENT, PANEL_BG),
            ItemRole::Key => (BASE_BG, NOTE),
            _ if item.found => (GOOD, DESK_BG),
            _ => (TEXT, DESK_BG),
        };
        if r.h >= 2 {
            c.frame(r, fg, bg);
        } else {
            c.fill(r, bg);
        }
        let label = if item.role == ItemRole::Entry { "LAPTOP" } else { item.name };
        let mark = if item.found { "✓" } else { "" };
        let inner_w = (r.w - 2).max(1) as usize;
        let label_y = if r.h >= 3 { r.y + r.h / 2 } else { r.y };
        let label_x = if r.h >= 2 { r.x + 1 } else { r.x };
        c.text_clip(label_x, label_y, &format!("{label}{mark}"), inner_w, fg, bg);
    }

    if let Some(t) = s.tutorial {
        let panel = Region::new(20, 10, 60, 7);
        c.frame(panel, WARN, PANEL_BG);
        c.text(23, 11, &format!("TUTORIAL {}/{}", t.index + 1, t.total), WARN, PANEL_BG);
        for (i, line) in wrap(t.text, 54).iter().enumerate().take(3) {
            c.text(23, 13 + i as i32, line, TEXT, PANEL_BG);
        }
    }
}

fn compose_login(c: &mut Canvas, s: &Snapshot) {
    let panel = Region::new(30, 9, 40, 10);
    c.frame(panel, ACCENT, PANEL_BG);
    c.text(33, 10, "NEXACORP WORKSTATION", ACCENT, PANEL_BG);
    c.text(33, 12, "Password:", TEXT, PANEL_BG);
    let field = format!("{}_", "*".repeat(s.login.masked_len));
    c.text_clip(43, 12, &field, 25, NOTE, PANEL_BG);
    let attempts_color = if s.login.attempts_left <= 1 { BAD } else { TEXT };
    c.text(
        33, 14,
        &format!("Attempts left: {}/{}", s.login.attempts_left, s.login.attempts_max),
        attempts_color, PANEL_BG,
    );
    if s.login.wrong {
        c.text(33, 16, "ACCESS DENIED", BAD, PANEL_BG);
    }
}

fn compose_map(c: &mut Canvas, s: &Snapshot) {
    c.centered(3, "CITY MAP: choose your next case", ACCENT, BASE_BG);
    for (i, pin) in s.map.pins.iter().enumerate() {
        let selected = i == s.map.cursor;
        let fg = match (pin.unlocked, selected) {
            (false, _) => DIM,
            (true, true) => NOTE,
            (true, false) => TEXT,
        };
        c.frame(pin.region, fg, if selected { PANEL_BG } else { BASE_BG });
        let status = if pin.completed { " ✓" } else if !pin.unlocked { " (locked)" } else { "" };
        let bg = if selected { PANEL_BG } else { BASE_BG };
        c.text_clip(
            pin.region.x + 1, pin.region.y + 1,
            &format!("{} {}{}", i + 1, pin.name, status),
            (pin.region.w - 2) as usize, fg, bg,
        );
    }
}

fn compose_inbox(c: &mut Canvas, s: &Snapshot) {
    c.text(layout::INBOX_X, 3, "INBOX", ACCENT, BASE_BG);
    let selected = s.inbox.selected.as_ref().map(|v| v.index);
    for (i, email) in s.inbox.emails.iter().enumerate() {
        let r = layout::inbox_row(i);
        let bg = if selected == Some(i) { PANEL_BG } else { BASE_BG };
        c.fill(r, bg);
        let (tag, tag_color) = match (email.classified_as, email.correct) {
            (Some(v), Some(true)) => (v.label(), GOOD),
            (Some(v), _) => (v.label(), BAD),
            (None, _) => ("NEW", ACCENT),
        };
        c.text(r.x + 1, r.y, tag, tag_color, bg);
        c.text_clip(r.x + 1, r.y + 1, email.subject, (r.w - 2) as usize, TEXT, bg);
        c.text_clip(r.x + 1, r.y + 2, email.sender, (r.w - 2) as usize, DIM, bg);
    }

    c.frame(DETAIL, DIM, PANEL_BG);
    let Some(inspect) = s.inbox.selected.as_ref() else {
        let msg = if s.inbox.done { "All emails classified. Stand by..." } else { "Select an email to inspect it." };
        c.text(DETAIL.x + 2, DETAIL.y + 2, msg, DIM, PANEL_BG);
        return;
    };
    let Some(email) = s.inbox.emails.get(inspect.index) else { return };
    let inner_w = (DETAIL.w - 4) as usize;
    let x = DETAIL.x + 2;
    c.text_clip(x, DETAIL.y + 1, &format!("From: {}", email.sender), inner_w, TEXT, PANEL_BG);
    c.text_clip(x, DETAIL.y + 2, &format!("Subject: {}", email.subject), inner_w, TEXT, PANEL_BG);
    let mut y = DETAIL.y + 4;
    for line in wrap(email.body, inner_w).iter().take(6) {
        c.text(x, y, line, TEXT, PANEL_BG);
        y += 1;
    }
    y += 1;
    for el in &inspect.spotted {
        for line in wrap(&format!("! {}: {}", el.kind.label(), el.explanation), inner_w).iter().take(2) {
            if y >= DETAIL.y + DETAIL.h - 1 { break; }
            c.text(x, y, line, WARN, PANEL_BG);
            y += 1;
        }
    }

    for kind in ElementKind::ALL {
        let r = layout::probe_button(kind);
        let spotted = inspect.spotted.iter().any(|e| e.kind == kind);
        let bg = if spotted { WARN } else { DIM };
        c.fill(r, bg);
        c.text(r.x + 2, r.y, kind.label(), BASE_BG, bg);
    }
    for verdict in [Verdict::Phishing, Verdict::Safe] {
        let r = layout::verdict_button(verdict);
        let bg = if verdict == Verdict::Phishing { BAD } else { GOOD };
        c.fill(r, bg);
        c.text(r.x + 2, r.y, verdict.label(), BASE_BG, bg);
    }
}

fn compose_quiz(c: &mut Canvas, s: &Snapshot) {
    let Some(q) = s.quiz else { return };
    c.centered(3, &format!("SECURITY QUIZ  {}/{}   Score {}", q.index + 1, q.total, q.score), ACCENT, BASE_BG);
    for (i, line) in wrap(q.prompt, 84).iter().enumerate().take(2) {
        c.text(8, 5 + i as i32, line, TEXT, BASE_BG);
    }
    for (i, choice) in q.choices.iter().enumerate() {
        let r = layout::quiz_choice(i);
        let letter = (b'A' + i as u8) as char;
        let color = match q.answered {
            Some(out) if out.answer == letter => GOOD,
            Some(_) => DIM,
            None => TEXT,
        };
        c.text_clip(r.x, r.y, choice, r.w as usize, color, BASE_BG);
    }
    if q.answered.is_some() {
        let panel = Region::new(6, 18, 88, 6);
        c.frame(panel, DIM, PANEL_BG);
        for (i, line) in q.explanation.iter().enumerate() {
            c.text_clip(8, 19 + i as i32, line, 84, TEXT, PANEL_BG);
        }
        c.text(8, 22, "[Enter] Next", DIM, PANEL_BG);
    }
}

fn compose_result(c: &mut Canvas, s: &Snapshot) {
    let (title, color) = match s.phase {
        Phase::MissionFailed { reason, .. } => (reason.message(), BAD),
        Phase::Level2Complete => ("PHISHING CAMPAIGN NEUTRALISED", GOOD),
        _ => ("ACCESS GRANTED: EVIDENCE SECURED", GOOD),
    };
    let panel = Region::new(20, 6, 60, 16);
    c.frame(panel, color, PANEL_BG);
    c.centered(8, title, color, PANEL_BG);
    if let Some(score) = s.score {
        c.centered(11, &format!("SCORE  {}", score.points), TEXT, PANEL_BG);
        c.centered(13, &format!("RANK  {}", score.rank), NOTE, PANEL_BG);
        c.centered(14, score.rank.title(), DIM, PANEL_BG);
    }
    if let Some(t) = s.timer {
        c.centered(
            16,
            &format!("Time left {}   Time used {}", fmt_clock(t.remaining_secs), fmt_clock(t.elapsed_secs)),
            DIM, PANEL_BG,
        );
    }
    match s.phase.level() {
        Some(1) => c.centered(
            18,
            &format!("Items {}/{}   Wrong clicks {}", s.desk.found, s.desk.total, s.desk.wrong_clicks),
            DIM, PANEL_BG,
        ),
        Some(_) => c.centered(
            18,
            &format!("Correct verdicts {}/{}", s.inbox.correct, s.inbox.emails.len()),
            DIM, PANEL_BG,
        ),
        None => {}
    }
}
