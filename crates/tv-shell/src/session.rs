//! Interactive game-table session.
//!
//! `Shell` interprets one line of input at a time and returns the text to
//! show. Commands may be abbreviated to any prefix (`r`, `ro`, `roll`), and
//! any line that is valid dice notation is rolled directly.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use tv_dice::{DiceError, Expression};
use tv_track::{
    NumberRegistry, NumberTracker, RotationManager, Timer, TimerRegistry, TrackError,
    format_duration, format_duration_short, parse_duration,
};

use crate::config::ShellConfig;
use crate::error::{ShellError, ShellResult};

const DICE_GLYPH: &str = "🎲";
const ALARM_GLYPH: &str = "⏰";

const HELP: &str = "\
Commands (any prefix works, e.g. 'r' for roll):
  roll <dice>                 Roll dice; a bare notation also rolls
  alarm <time> [label]        Start a countdown (e.g. 'a 5m', 'a 1h concentration')
  alarms                      List running alarms
  init <cmd>                  Initiative: start, add, next, back, kill, revive, list, end
  track <cmd>                 Number trackers: add, set, adjust (adj), list, pin, unpin,
                              pinall (pa), delete, deleteall (da), search (f)
  status                      Pinned trackers, alarms and the current turn
  history                     Recent rolls
  clear                       Forget roll history
  help                        Show this help
  quit                        Leave the shell

Dice:
  2d6        two six-sided dice
  d20+5      one d20 plus 5
  d20!       advantage: roll twice, keep the higher
  4d6kh3     four d6, keep the highest three (also kl, dh, dl)

Examples:
  i start                     then '<name> <initiative>' per line, 'done' to finish
  i kill Goblin               mark Goblin as out of combat
  t add HP 35 45              create an HP tracker at 35/45
  t adj HP -10                subtract 10 from HP";

/// `word` is a non-empty prefix of `full`.
fn abbrev(word: &str, full: &str) -> bool {
    !word.is_empty() && full.starts_with(word)
}

/// Split off the last whitespace-separated token as a number.
fn split_number(args: &str) -> ShellResult<(&str, i32)> {
    let args = args.trim();
    let (head, last) = args.rsplit_once(char::is_whitespace).unwrap_or(("", args));
    let value = last
        .parse()
        .map_err(|_| ShellError::InvalidNumber(last.to_string()))?;
    Ok((head.trim(), value))
}

/// An interactive dice and tracker session.
pub struct Shell {
    config: ShellConfig,
    timers: TimerRegistry,
    trackers: NumberRegistry,
    rotation: RotationManager,
    history: VecDeque<String>,
    entry_mode: bool,
    quit: bool,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(ShellConfig::default())
    }
}

impl Shell {
    /// Create an empty session.
    pub fn new(config: ShellConfig) -> Self {
        Self {
            config,
            timers: TimerRegistry::new(),
            trackers: NumberRegistry::new(),
            rotation: RotationManager::new(),
            history: VecDeque::new(),
            entry_mode: false,
            quit: false,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Get the running alarms.
    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    /// Get the number trackers.
    pub fn trackers(&self) -> &NumberRegistry {
        &self.trackers
    }

    /// Get the initiative rotation.
    pub fn rotation(&self) -> &RotationManager {
        &self.rotation
    }

    /// Recent roll lines, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    /// Whether lines are being read as initiative entries.
    pub fn in_entry_mode(&self) -> bool {
        self.entry_mode
    }

    /// Whether `quit` has been entered.
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Prompt text for the current mode.
    pub fn prompt(&self) -> &'static str {
        if self.entry_mode { "init> " } else { "> " }
    }

    /// Announce and discard alarms that have expired.
    pub fn tick(&self) -> Vec<String> {
        self.tick_at(Utc::now())
    }

    /// Announce and discard alarms expired at `now`.
    pub fn tick_at(&self, now: DateTime<Utc>) -> Vec<String> {
        self.timers
            .pop_expired_at(now)
            .iter()
            .map(|t| {
                let text = match &t.label {
                    Some(label) => {
                        format!("Alarm '{label}' finished ({})", format_duration(t.duration))
                    }
                    None => format!("Alarm finished ({})", format_duration(t.duration)),
                };
                self.glyph(ALARM_GLYPH, text)
            })
            .collect()
    }

    /// Process a line of user input and return a response.
    pub fn process(&mut self, input: &str) -> ShellResult<String> {
        let trimmed = input.trim();
        if self.entry_mode {
            return self.do_entry(trimmed);
        }
        if trimmed.is_empty() {
            return Ok(String::new());
        }

        let (cmd, rest) = trimmed
            .split_once(char::is_whitespace)
            .map(|(c, r)| (c, r.trim()))
            .unwrap_or((trimmed, ""));
        let cmd = cmd.to_lowercase();
        let c = cmd.as_str();

        if abbrev(c, "roll") {
            self.do_roll(rest)
        } else if c == "alarms" {
            self.do_alarm_list()
        } else if abbrev(c, "alarm") {
            self.do_alarm(rest)
        } else if abbrev(c, "initiative") {
            self.do_init(rest)
        } else if abbrev(c, "tracker") {
            self.do_track(rest)
        } else if abbrev(c, "help") {
            Ok(HELP.to_string())
        } else if abbrev(c, "history") {
            self.do_history()
        } else if abbrev(c, "status") {
            self.do_status()
        } else if abbrev(c, "quit") || c == "exit" {
            self.quit = true;
            Ok("Goodbye!".to_string())
        } else if abbrev(c, "clear") {
            self.history.clear();
            Ok("History cleared.".to_string())
        } else {
            match tv_dice::parse(trimmed) {
                Ok(expr) => self.roll_expression(&expr),
                Err(err) => {
                    debug!(%err, input = trimmed, "not a command or notation");
                    Err(ShellError::UnknownCommand(cmd))
                }
            }
        }
    }

    fn glyph(&self, glyph: &str, text: String) -> String {
        if self.config.glyphs {
            format!("{glyph} {text}")
        } else {
            text
        }
    }

    fn do_roll(&mut self, notation: &str) -> ShellResult<String> {
        if notation.is_empty() {
            return Err(ShellError::Usage("roll <dice> (e.g. 'r 2d6+3', 'r d20!', 'r 4d6kh3')"));
        }
        let expr = tv_dice::parse(notation)?;
        self.roll_expression(&expr)
    }

    fn roll_expression(&mut self, expr: &Expression) -> ShellResult<String> {
        let result = tv_dice::evaluate(expr).map_err(|err| {
            warn!(%err, expression = %expr, "roll failed");
            DiceError::from(err)
        })?;
        let line = result.to_string();
        self.history.push_back(line.clone());
        while self.history.len() > self.config.history_limit {
            self.history.pop_front();
        }
        Ok(self.glyph(DICE_GLYPH, line))
    }

    fn do_history(&self) -> ShellResult<String> {
        if self.history.is_empty() {
            return Ok("No rolls yet.".to_string());
        }
        let mut out = format!("Recent rolls ({}):\n", self.history.len());
        for (i, line) in self.history.iter().enumerate() {
            out.push_str(&format!("  {}. {line}\n", i + 1));
        }
        Ok(out.trim_end().to_string())
    }

    fn do_alarm(&mut self, rest: &str) -> ShellResult<String> {
        let (duration_text, label) = rest
            .split_once(char::is_whitespace)
            .map(|(d, l)| (d, l.trim()))
            .unwrap_or((rest, ""));
        if duration_text.is_empty() {
            return Err(ShellError::Usage("alarm <duration> [label] (e.g. 'a 5m', 'a 1h30m rest')"));
        }
        let duration = parse_duration(duration_text)?;
        let label = (!label.is_empty()).then(|| label.to_string());
        let text = match &label {
            Some(l) => format!("Started alarm '{l}' for {}", format_duration(duration)),
            None => format!("Started alarm for {}", format_duration(duration)),
        };
        self.timers.add(Timer::new(duration, label));
        Ok(self.glyph(ALARM_GLYPH, text))
    }

    fn alarm_summary(t: &Timer, now: DateTime<Utc>) -> String {
        format!(
            "{} {}/{}",
            t.label.as_deref().unwrap_or("(unnamed)"),
            format_duration_short(t.remaining_at(now)),
            format_duration_short(t.duration)
        )
    }

    fn do_alarm_list(&self) -> ShellResult<String> {
        let now = Utc::now();
        let active = self.timers.active_at(now);
        if active.is_empty() {
            return Ok("No alarms running.".to_string());
        }
        let mut out = format!("Alarms ({}):\n", active.len());
        for t in &active {
            out.push_str(&format!("  {}\n", Self::alarm_summary(t, now)));
        }
        Ok(out.trim_end().to_string())
    }

    fn add_participant(&self, line: &str) -> ShellResult<String> {
        let (name, initiative) = split_number(line)?;
        if name.is_empty() {
            return Err(ShellError::Usage("<name> <initiative> (or 'done' to finish)"));
        }
        self.rotation.add(name, initiative)?;
        Ok(format!("Added {name} (initiative {initiative})"))
    }

    fn do_entry(&mut self, line: &str) -> ShellResult<String> {
        let lower = line.to_lowercase();
        if line.is_empty() || lower == "done" || lower == "end" {
            self.entry_mode = false;
            return Ok("Initiative setup complete. Use 'init next' to advance turns.".to_string());
        }
        self.add_participant(line)
    }

    fn do_init(&mut self, rest: &str) -> ShellResult<String> {
        let (sub, arg) = rest
            .split_once(char::is_whitespace)
            .map(|(s, a)| (s, a.trim()))
            .unwrap_or((rest, ""));
        let sub = sub.to_lowercase();
        let s = sub.as_str();

        if abbrev(s, "start") {
            self.rotation.start();
            if !arg.is_empty() {
                return self.add_participant(arg);
            }
            self.entry_mode = true;
            Ok("Starting initiative. Enter '<name> <initiative>' for each participant.\n\
                Type 'done' when finished."
                .to_string())
        } else if abbrev(s, "add") {
            if !self.rotation.is_active() {
                return Err(TrackError::NoRotation.into());
            }
            if !arg.is_empty() {
                return self.add_participant(arg);
            }
            self.entry_mode = true;
            Ok("Enter '<name> <initiative>' or 'done' to finish.".to_string())
        } else if abbrev(s, "next") {
            let (p, round) = self.rotation.next()?;
            Ok(format!("Turn: {} (initiative {}) - Round {round}", p.name, p.initiative))
        } else if abbrev(s, "back") {
            let (p, round) = self.rotation.previous()?;
            Ok(format!("Turn: {} (initiative {}) - Round {round}", p.name, p.initiative))
        } else if abbrev(s, "kill") {
            if arg.is_empty() {
                return Err(ShellError::Usage("init kill <name>"));
            }
            self.rotation.mark_out(arg)?;
            Ok(format!("{arg} is out of combat"))
        } else if abbrev(s, "revive") {
            if arg.is_empty() {
                return Err(ShellError::Usage("init revive <name>"));
            }
            self.rotation.mark_in(arg)?;
            Ok(format!("{arg} is back in combat"))
        } else if abbrev(s, "list") {
            self.do_init_list()
        } else if abbrev(s, "end") {
            let last = self.rotation.end().ok_or(TrackError::NoRotation)?;
            Ok(format!("Initiative ended after round {}.", last.round()))
        } else if s.is_empty() {
            Err(ShellError::Usage("init start|add|next|back|kill|revive|list|end"))
        } else {
            Err(ShellError::UnknownCommand(format!("init {sub}")))
        }
    }

    fn do_init_list(&self) -> ShellResult<String> {
        let rotation = self.rotation.snapshot().ok_or(TrackError::NoRotation)?;
        if rotation.is_empty() {
            return Ok(format!("Round {}: no participants.", rotation.round()));
        }
        let mut out = format!("Round {}:\n", rotation.round());
        for (i, p) in rotation.participants().iter().enumerate() {
            let marker = if i == rotation.current_turn() { ">" } else { " " };
            let out_flag = if p.active { "" } else { " (out)" };
            out.push_str(&format!("{marker} {:>3}  {}{out_flag}\n", p.initiative, p.name));
        }
        Ok(out.trim_end().to_string())
    }

    fn do_track(&mut self, rest: &str) -> ShellResult<String> {
        let (sub, arg) = rest
            .split_once(char::is_whitespace)
            .map(|(s, a)| (s, a.trim()))
            .unwrap_or((rest, ""));
        let sub = sub.to_lowercase();
        let s = sub.as_str();

        if abbrev(s, "add") {
            const USAGE: &str = "track add <name> <current> <max>";
            let (head, max) = split_number(arg).map_err(|_| ShellError::Usage(USAGE))?;
            let (name, current) = name_and_number(head, USAGE)?;
            let t = self.trackers.add(name, current, max)?;
            Ok(format!("Added tracker: {t}"))
        } else if abbrev(s, "adjust") {
            let (name, delta) = name_and_number(arg, "track adjust <name> <delta>")?;
            Ok(self.trackers.adjust(name, delta)?.to_string())
        } else if abbrev(s, "set") {
            let (name, value) = name_and_number(arg, "track set <name> <value>")?;
            Ok(self.trackers.set(name, value)?.to_string())
        } else if abbrev(s, "search") || s == "f" || s == "find" {
            if arg.is_empty() {
                return Err(ShellError::Usage("track search <pattern>"));
            }
            let found = self.trackers.search(arg);
            if found.is_empty() {
                return Ok(format!("No trackers matching '{arg}'"));
            }
            Ok(format_trackers(&format!("Trackers matching '{arg}':"), &found))
        } else if abbrev(s, "list") {
            let all = self.trackers.list();
            if all.is_empty() {
                return Ok("No trackers.".to_string());
            }
            Ok(format_trackers("Trackers:", &all))
        } else if abbrev(s, "pin") {
            let name = required(arg, "track pin <name>")?;
            Ok(format!("Pinned [{}]", self.trackers.pin(name)?.name))
        } else if abbrev(s, "pinall") || s == "pa" {
            Ok(format!("Pinned {} tracker(s)", self.trackers.pin_all()))
        } else if abbrev(s, "unpin") {
            let name = required(arg, "track unpin <name>")?;
            Ok(format!("Unpinned [{}]", self.trackers.unpin(name)?.name))
        } else if abbrev(s, "delete") {
            let name = required(arg, "track delete <name>")?;
            Ok(format!("Deleted tracker '{}'", self.trackers.delete(name)?.name))
        } else if abbrev(s, "deleteall") || s == "da" {
            let count = self.trackers.count();
            self.trackers.delete_all();
            Ok(format!("Deleted {count} tracker(s)"))
        } else if s.is_empty() {
            Err(ShellError::Usage(
                "track add|set|adjust|list|pin|unpin|pinall|delete|deleteall|search",
            ))
        } else {
            Err(ShellError::UnknownCommand(format!("track {sub}")))
        }
    }

    fn do_status(&self) -> ShellResult<String> {
        let mut lines = Vec::new();

        let pinned = self.trackers.pinned();
        if !pinned.is_empty() {
            let shown: Vec<String> = pinned.iter().map(ToString::to_string).collect();
            lines.push(format!("Pinned: {}", shown.join("  ")));
        }

        let now = Utc::now();
        let alarms = self.timers.active_at(now);
        if !alarms.is_empty() {
            let shown: Vec<String> = alarms.iter().map(|t| Self::alarm_summary(t, now)).collect();
            lines.push(self.glyph(ALARM_GLYPH, format!("Alarms: {}", shown.join(", "))));
        }

        if let Some(rotation) = self.rotation.snapshot() {
            match rotation.current() {
                Some(p) => lines.push(format!(
                    "Turn: {} (initiative {}) - Round {}",
                    p.name,
                    p.initiative,
                    rotation.round()
                )),
                None => lines.push("Initiative running, no participants yet.".to_string()),
            }
        }

        if lines.is_empty() {
            return Ok("Nothing to report.".to_string());
        }
        Ok(lines.join("\n"))
    }
}

fn name_and_number<'a>(arg: &'a str, usage: &'static str) -> ShellResult<(&'a str, i32)> {
    match split_number(arg) {
        Ok((name, value)) if !name.is_empty() => Ok((name, value)),
        Ok(_) => Err(ShellError::Usage(usage)),
        Err(err) if arg.contains(char::is_whitespace) => Err(err),
        Err(_) => Err(ShellError::Usage(usage)),
    }
}

fn required<'a>(arg: &'a str, usage: &'static str) -> ShellResult<&'a str> {
    if arg.is_empty() {
        Err(ShellError::Usage(usage))
    } else {
        Ok(arg)
    }
}

fn format_trackers(header: &str, trackers: &[NumberTracker]) -> String {
    let mut out = format!("{header}\n");
    for t in trackers {
        let pinned = if t.pinned { " (pinned)" } else { "" };
        out.push_str(&format!("  {t}{pinned}\n"));
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::TimeDelta;

    use super::*;

    fn shell() -> Shell {
        Shell::new(ShellConfig::default().with_glyphs(false))
    }

    fn run(shell: &mut Shell, lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| shell.process(l).unwrap()).collect()
    }

    #[test]
    fn empty_input() {
        let mut s = shell();
        assert_eq!(s.process("   ").unwrap(), "");
    }

    #[test]
    fn roll_command_and_abbreviations() {
        let mut s = shell();
        for line in ["roll 2d6", "ro 2d6", "r 2d6", "R 2D6"] {
            let out = s.process(line).unwrap();
            assert!(out.starts_with("2d6: ["), "{line}: {out}");
        }
        assert_eq!(s.history().count(), 4);
    }

    #[test]
    fn bare_notation_rolls() {
        let mut s = shell();
        let out = s.process("d20+5").unwrap();
        assert!(out.starts_with("1d20+5: ["), "{out}");
        assert!(out.contains(" +5 = "));
    }

    #[test]
    fn notation_with_spaces() {
        let mut s = shell();
        let out = s.process("r 4d6 kh3").unwrap();
        assert!(out.starts_with("4d6kh3: ["), "{out}");
    }

    #[test]
    fn glyph_prefix() {
        let mut s = Shell::default();
        assert!(s.process("r d6").unwrap().starts_with("🎲 1d6: ["));
        assert!(s.process("a 5m").unwrap().starts_with("⏰ Started alarm"));
    }

    #[test]
    fn bad_notation_and_unknown_commands() {
        let mut s = shell();
        assert!(matches!(s.process("r 2x6"), Err(ShellError::Dice(_))));
        assert!(matches!(s.process("r"), Err(ShellError::Usage(_))));
        let err = s.process("xyzzy now").unwrap_err();
        assert_eq!(err.to_string(), "unknown command: xyzzy (type 'help' for help)");
    }

    #[test]
    fn history_is_bounded() {
        let mut s = Shell::new(ShellConfig::default().with_glyphs(false).with_history_limit(2));
        run(&mut s, &["r 1d4", "r 1d6", "r 1d8"]);
        let kept: Vec<&str> = s.history().collect();
        assert_eq!(kept.len(), 2);
        assert!(kept[0].starts_with("1d6"));
        assert!(kept[1].starts_with("1d8"));

        let out = s.process("history").unwrap();
        assert!(out.starts_with("Recent rolls (2):\n  1. 1d6"), "{out}");

        s.process("clear").unwrap();
        assert_eq!(s.process("hi").unwrap(), "No rolls yet.");
    }

    #[test]
    fn help_and_quit() {
        let mut s = shell();
        assert!(s.process("h").unwrap().contains("alarm <time> [label]"));
        assert!(!s.should_quit());
        assert_eq!(s.process("q").unwrap(), "Goodbye!");
        assert!(s.should_quit());
    }

    #[test]
    fn alarm_start_and_list() {
        let mut s = shell();
        insta::assert_snapshot!(s.process("a 5m torch").unwrap(), @"Started alarm 'torch' for 5m0s");
        insta::assert_snapshot!(s.process("alarm 90s").unwrap(), @"Started alarm for 1m30s");
        assert_eq!(s.timers().count(), 2);

        let list = s.process("alarms").unwrap();
        assert!(list.starts_with("Alarms (2):\n  (unnamed) "), "{list}");
        assert!(list.contains("torch "));

        assert!(matches!(s.process("a soon"), Err(ShellError::Track(_))));
        assert!(matches!(s.process("a"), Err(ShellError::Usage(_))));
    }

    #[test]
    fn tick_announces_expired_alarms() {
        let s = shell();
        let past = Utc::now() - TimeDelta::minutes(10);
        s.timers()
            .add(Timer::started(Duration::from_secs(60), Some("rest".into()), past));
        s.timers().add(Timer::started(Duration::from_secs(30), None, past));
        s.timers().add(Timer::new(Duration::from_secs(3600), None));

        let lines = s.tick();
        assert_eq!(
            lines,
            vec!["Alarm finished (30s)", "Alarm 'rest' finished (1m0s)"]
        );
        assert!(s.tick().is_empty());
        assert_eq!(s.timers().count(), 1);
    }

    #[test]
    fn tick_uses_alarm_glyph() {
        let s = Shell::default();
        let t0 = Utc::now();
        s.timers().add(Timer::started(Duration::from_secs(5), None, t0));
        assert!(s.tick_at(t0).is_empty());
        assert_eq!(
            s.tick_at(t0 + TimeDelta::seconds(5)),
            vec!["⏰ Alarm finished (5s)"]
        );
    }

    #[test]
    fn initiative_entry_mode() {
        let mut s = shell();
        s.process("i start").unwrap();
        assert!(s.in_entry_mode());
        assert_eq!(s.prompt(), "init> ");

        assert_eq!(s.process("Goblin 12").unwrap(), "Added Goblin (initiative 12)");
        assert_eq!(s.process("Aria Swiftwind 18").unwrap(), "Added Aria Swiftwind (initiative 18)");
        assert!(matches!(s.process("Bram"), Err(ShellError::InvalidNumber(_))));
        assert!(s.in_entry_mode());
        s.process("done").unwrap();
        assert!(!s.in_entry_mode());

        insta::assert_snapshot!(s.process("i n").unwrap(), @"Turn: Goblin (initiative 12) - Round 1");
        insta::assert_snapshot!(s.process("init next").unwrap(), @"Turn: Aria Swiftwind (initiative 18) - Round 2");
        insta::assert_snapshot!(s.process("i b").unwrap(), @"Turn: Goblin (initiative 12) - Round 1");
    }

    #[test]
    fn empty_line_ends_entry_mode() {
        let mut s = shell();
        run(&mut s, &["init start", "Aria 18"]);
        s.process("").unwrap();
        assert!(!s.in_entry_mode());
        assert_eq!(s.rotation().snapshot().unwrap().participants().len(), 1);
    }

    #[test]
    fn initiative_kill_list_and_end() {
        let mut s = shell();
        run(
            &mut s,
            &["i s", "Aria 18", "Goblin 12", "Bram 12", "done", "i k goblin"],
        );
        assert_eq!(
            s.process("i list").unwrap(),
            "Round 1:\n>  18  Aria\n   12  Bram\n   12  Goblin (out)"
        );
        assert_eq!(s.process("i n").unwrap(), "Turn: Bram (initiative 12) - Round 1");
        assert_eq!(s.process("i n").unwrap(), "Turn: Aria (initiative 18) - Round 2");
        assert_eq!(s.process("i revive goblin").unwrap(), "goblin is back in combat");
        assert!(matches!(
            s.process("i k Dragon"),
            Err(ShellError::Track(TrackError::ParticipantNotFound(_)))
        ));
        assert_eq!(s.process("i e").unwrap(), "Initiative ended after round 2.");
        assert!(matches!(
            s.process("i n"),
            Err(ShellError::Track(TrackError::NoRotation))
        ));
    }

    #[test]
    fn initiative_add_inline() {
        let mut s = shell();
        assert!(matches!(
            s.process("i add Orc 9"),
            Err(ShellError::Track(TrackError::NoRotation))
        ));
        s.process("i start Aria 18").unwrap();
        assert!(!s.in_entry_mode());
        s.process("i add Orc 9").unwrap();
        s.process("i a").unwrap();
        assert!(s.in_entry_mode());
        s.process("end").unwrap();
        assert_eq!(s.rotation().snapshot().unwrap().participants().len(), 2);
        assert!(matches!(s.process("i zap"), Err(ShellError::UnknownCommand(_))));
    }

    #[test]
    fn tracker_commands() {
        let mut s = shell();
        insta::assert_snapshot!(s.process("t add HP 35 45").unwrap(), @"Added tracker: [HP] 35/45");
        s.process("track a Arrows 20 20").unwrap();
        insta::assert_snapshot!(s.process("t s hp 40").unwrap(), @"[HP] 40/45");
        insta::assert_snapshot!(s.process("t adj HP -10").unwrap(), @"[HP] 30/45");
        insta::assert_snapshot!(s.process("t adjust HP +20").unwrap(), @"[HP] 50/45");
        insta::assert_snapshot!(s.process("t p hp").unwrap(), @"Pinned [HP]");

        assert_eq!(
            s.process("t l").unwrap(),
            "Trackers:\n  [Arrows] 20/20\n  [HP] 50/45 (pinned)"
        );
        assert_eq!(s.process("t pa").unwrap(), "Pinned 1 tracker(s)");
        assert_eq!(s.process("t u arrows").unwrap(), "Unpinned [Arrows]");
        assert_eq!(s.process("t f arr").unwrap(), "Trackers matching 'arr':\n  [Arrows] 20/20");
        assert_eq!(s.process("t f mana").unwrap(), "No trackers matching 'mana'");
        assert_eq!(s.process("t d arrows").unwrap(), "Deleted tracker 'Arrows'");
        assert_eq!(s.process("t da").unwrap(), "Deleted 1 tracker(s)");
        assert_eq!(s.process("t list").unwrap(), "No trackers.");
    }

    #[test]
    fn tracker_errors() {
        let mut s = shell();
        s.process("t add HP 10 10").unwrap();
        assert!(matches!(
            s.process("t add hp 1 1"),
            Err(ShellError::Track(TrackError::DuplicateTracker(_)))
        ));
        assert!(matches!(s.process("t add HP 10"), Err(ShellError::Usage(_))));
        assert!(matches!(s.process("t set HP lots"), Err(ShellError::InvalidNumber(_))));
        assert!(matches!(s.process("t set HP"), Err(ShellError::Usage(_))));
        assert!(matches!(
            s.process("t set MP 3"),
            Err(ShellError::Track(TrackError::TrackerNotFound(_)))
        ));
        assert!(matches!(s.process("t"), Err(ShellError::Usage(_))));
        assert!(matches!(s.process("t bogus"), Err(ShellError::UnknownCommand(_))));
    }

    #[test]
    fn multi_word_tracker_names() {
        let mut s = shell();
        s.process("t add Spell Slots 3 4").unwrap();
        assert_eq!(s.process("t adj spell slots -1").unwrap(), "[Spell Slots] 2/4");
    }

    #[test]
    fn status_report() {
        let mut s = shell();
        assert_eq!(s.process("status").unwrap(), "Nothing to report.");

        run(&mut s, &["t add HP 30 45", "t pin HP", "i start Aria 18", "a 10m torch"]);
        let status = s.process("st").unwrap();
        let lines: Vec<&str> = status.lines().collect();
        assert_eq!(lines[0], "Pinned: [HP] 30/45");
        assert!(lines[1].starts_with("Alarms: torch "), "{status}");
        assert_eq!(lines[2], "Turn: Aria (initiative 18) - Round 1");
    }
}
