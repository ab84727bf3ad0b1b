/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

use crate::sim::content;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub tick_rate_ms: u64,
    pub rules: RulesConfig,
    pub gamepad: GamepadConfig,
    pub log: LogConfig,
}

/// Everything the session controller needs. Input and logging settings
/// stay with the binary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RulesConfig {
    pub feedback_ms: u64,
    pub level1: Level1Rules,
    pub level2: Level2Rules,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level1Rules {
    pub time_limit_secs: u32,
    pub miss_click_penalty_secs: u32,
    pub decoy_penalty_secs: u32,
    pub reveal_threshold: usize,
    pub password_attempts: u32,
    pub max_hints: u32,
    pub hint_penalty_secs: u32,
    /// Show the three-line tutorial on the first desk search.
    pub tutorial: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level2Rules {
    pub time_limit_secs: u32,
    pub wrong_verdict_penalty_secs: u32,
    pub max_hints: u32,
    pub hint_penalty_secs: u32,
    /// Pause between the last verdict and the quiz.
    pub quiz_delay_ms: u64,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub click: Vec<String>,
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub hint: Vec<String>,
    pub retry: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub file: PathBuf,
    pub level: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    level1: TomlLevel1,
    #[serde(default)]
    level2: TomlLevel2,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_feedback_ms")]
    feedback_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlLevel1 {
    #[serde(default = "default_l1_limit")]
    time_limit_secs: u32,
    #[serde(default = "default_miss_click")]
    miss_click_penalty_secs: u32,
    #[serde(default = "default_decoy")]
    decoy_penalty_secs: u32,
    #[serde(default = "default_reveal_threshold")]
    reveal_threshold: usize,
    #[serde(default = "default_attempts")]
    password_attempts: u32,
    #[serde(default = "default_l1_hints")]
    max_hints: u32,
    #[serde(default = "default_hint_penalty")]
    hint_penalty_secs: u32,
    #[serde(default = "default_tutorial")]
    tutorial: bool,
}

#[derive(Deserialize, Debug)]
struct TomlLevel2 {
    #[serde(default = "default_l2_limit")]
    time_limit_secs: u32,
    #[serde(default = "default_wrong_verdict")]
    wrong_verdict_penalty_secs: u32,
    #[serde(default = "default_l2_hints")]
    max_hints: u32,
    #[serde(default = "default_hint_penalty")]
    hint_penalty_secs: u32,
    #[serde(default = "default_quiz_delay")]
    quiz_delay_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_click")]
    click: Vec<String>,
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
    #[serde(default = "default_hint")]
    hint: Vec<String>,
    #[serde(default = "default_retry")]
    retry: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_file")]
    file: String,
    #[serde(default = "default_log_level")]
    level: String,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 16 }     // ~60 Hz
fn default_feedback_ms() -> u64 { 3000 }
fn default_l1_limit() -> u32 { 90 }
fn default_miss_click() -> u32 { 3 }
fn default_decoy() -> u32 { 5 }
fn default_reveal_threshold() -> usize { 3 }
fn default_attempts() -> u32 { 3 }
fn default_l1_hints() -> u32 { 3 }
fn default_hint_penalty() -> u32 { 10 }
fn default_tutorial() -> bool { true }
fn default_l2_limit() -> u32 { 60 }
fn default_wrong_verdict() -> u32 { 5 }
fn default_l2_hints() -> u32 { 2 }
fn default_quiz_delay() -> u64 { 1500 }

fn default_click() -> Vec<String> { vec!["A".into()] }
fn default_confirm() -> Vec<String> { vec!["Start".into(), "X".into()] }
fn default_cancel() -> Vec<String> { vec!["B".into(), "Select".into()] }
fn default_hint() -> Vec<String> { vec!["Y".into()] }
fn default_retry() -> Vec<String> { vec!["Start".into()] }
fn default_log_file() -> String { "cyber-detective.log".into() }
fn default_log_level() -> String { "info".into() }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            tick_rate_ms: default_tick_rate(),
            feedback_ms: default_feedback_ms(),
        }
    }
}

impl Default for TomlLevel1 {
    fn default() -> Self {
        TomlLevel1 {
            time_limit_secs: default_l1_limit(),
            miss_click_penalty_secs: default_miss_click(),
            decoy_penalty_secs: default_decoy(),
            reveal_threshold: default_reveal_threshold(),
            password_attempts: default_attempts(),
            max_hints: default_l1_hints(),
            hint_penalty_secs: default_hint_penalty(),
            tutorial: default_tutorial(),
        }
    }
}

impl Default for TomlLevel2 {
    fn default() -> Self {
        TomlLevel2 {
            time_limit_secs: default_l2_limit(),
            wrong_verdict_penalty_secs: default_wrong_verdict(),
            max_hints: default_l2_hints(),
            hint_penalty_secs: default_hint_penalty(),
            quiz_delay_ms: default_quiz_delay(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            click: default_click(),
            confirm: default_confirm(),
            cancel: default_cancel(),
            hint: default_hint(),
            retry: default_retry(),
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default()).rules
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) XDG data home, (4) system data directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        let mut cfg = Self::from_toml(toml_cfg);

        // Relative log paths land next to the config search root
        if cfg.log.file.is_relative() {
            if let Some(dir) = search_dirs.first() {
                cfg.log.file = dir.join(&cfg.log.file);
            }
        }
        cfg
    }

    /// Parse a config document. Absent tables and keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(Self::from_toml(toml_cfg))
    }

    fn from_toml(t: TomlConfig) -> Self {
        GameConfig {
            tick_rate_ms: t.timing.tick_rate_ms.max(1),
            rules: RulesConfig {
                feedback_ms: t.timing.feedback_ms,
                level1: Level1Rules {
                    time_limit_secs: t.level1.time_limit_secs,
                    miss_click_penalty_secs: t.level1.miss_click_penalty_secs,
                    decoy_penalty_secs: t.level1.decoy_penalty_secs,
                    reveal_threshold: t.level1.reveal_threshold.min(content::max_reveal_threshold()),
                    password_attempts: t.level1.password_attempts.max(1),
                    max_hints: t.level1.max_hints,
                    hint_penalty_secs: t.level1.hint_penalty_secs,
                    tutorial: t.level1.tutorial,
                },
                level2: Level2Rules {
                    time_limit_secs: t.level2.time_limit_secs,
                    wrong_verdict_penalty_secs: t.level2.wrong_verdict_penalty_secs,
                    max_hints: t.level2.max_hints,
                    hint_penalty_secs: t.level2.hint_penalty_secs,
                    quiz_delay_ms: t.level2.quiz_delay_ms,
                },
            },
            gamepad: GamepadConfig {
                click: t.gamepad.click,
                confirm: t.gamepad.confirm,
                cancel: t.gamepad.cancel,
                hint: t.gamepad.hint,
                retry: t.gamepad.retry,
            },
            log: LogConfig {
                file: PathBuf::from(t.log.file),
                level: t.log.level,
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/cyber-detective");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory
    let sys = PathBuf::from("/usr/share/cyber-detective");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
