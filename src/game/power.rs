use std::time::Duration;

use super::grid::Position;

/// Points granted instantly by a score power-up
pub const BONUS_POINTS: u32 = 30;
/// How long an uncollected power-up stays on the board
pub const UNCOLLECTED_TTL: Duration = Duration::from_secs(10);
/// Display window of the score bonus label
pub const SCORE_LABEL_TTL: Duration = Duration::from_secs(5);
/// Duration of the double-speed effect
pub const SPEED_TTL: Duration = Duration::from_secs(6);
/// Duration of the half-speed effect
pub const SLOW_TTL: Duration = Duration::from_secs(6);
/// How long an unused shield stays armed
pub const SHIELD_TTL: Duration = Duration::from_secs(10);

/// Multiplier while a speed effect is active
pub const SPEED_MULTIPLIER: f64 = 2.0;
/// Multiplier while a slow effect is active
pub const SLOW_MULTIPLIER: f64 = 0.5;
/// Multiplier with no effect active
pub const NORMAL_MULTIPLIER: f64 = 1.0;

/// The four power-up flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    /// Instant bonus points
    Score,
    /// Double movement speed
    Speed,
    /// Half movement speed
    Slow,
    /// Survive the next collision
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Score,
        PowerUpKind::Speed,
        PowerUpKind::Slow,
        PowerUpKind::Shield,
    ];

    /// Name shown in the header while the effect is active
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::Score => "Bonus",
            PowerUpKind::Speed => "Speed",
            PowerUpKind::Slow => "Slow",
            PowerUpKind::Shield => "Shield",
        }
    }
}

/// A power-up waiting on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerUp {
    pub position: Position,
    pub kind: PowerUpKind,
    /// Session time at which the uncollected power-up disappears
    pub expires_at: Duration,
}

/// The modifier concern a scheduled reversal targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Concern {
    Label,
    Multiplier,
    Shield,
}

/// An end-of-effect scheduled for later, stamped with the generation that created it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Reversal {
    concern: Concern,
    stamp: u64,
    due_at: Duration,
}

/// Active effects on the session: display label, speed multiplier, shield
///
/// Each concern keeps its own generation counter. Applying an effect bumps
/// the counter and schedules a reversal stamped with the new value; when a
/// reversal comes due it acts only if its stamp still matches, so an effect
/// applied later cannot be undone by an older timer.
#[derive(Debug, Clone, PartialEq)]
pub struct Modifiers {
    label: Option<PowerUpKind>,
    multiplier: f64,
    shield_armed: bool,
    label_gen: u64,
    multiplier_gen: u64,
    shield_gen: u64,
    pending: Vec<Reversal>,
}

impl Modifiers {
    pub fn new() -> Self {
        Self {
            label: None,
            multiplier: NORMAL_MULTIPLIER,
            shield_armed: false,
            label_gen: 0,
            multiplier_gen: 0,
            shield_gen: 0,
            pending: Vec::new(),
        }
    }

    /// Kind of the most recently applied effect still on display
    pub fn label(&self) -> Option<PowerUpKind> {
        self.label
    }

    /// Current speed multiplier
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Check if a shield would absorb the next collision
    pub fn shield_armed(&self) -> bool {
        self.shield_armed
    }

    /// Apply a collected power-up at session time `now`; returns the points
    /// it grants instantly
    pub fn apply(&mut self, kind: PowerUpKind, now: Duration) -> u32 {
        match kind {
            PowerUpKind::Score => {
                self.set_label(kind, now + SCORE_LABEL_TTL);
                BONUS_POINTS
            }
            PowerUpKind::Speed => {
                self.set_label(kind, now + SPEED_TTL);
                self.set_multiplier(SPEED_MULTIPLIER, now + SPEED_TTL);
                0
            }
            PowerUpKind::Slow => {
                self.set_label(kind, now + SLOW_TTL);
                self.set_multiplier(SLOW_MULTIPLIER, now + SLOW_TTL);
                0
            }
            PowerUpKind::Shield => {
                self.set_label(kind, now + SHIELD_TTL);
                self.arm_shield(now + SHIELD_TTL);
                0
            }
        }
    }

    /// Spend an armed shield on a collision
    ///
    /// Clears the label only when it still shows the shield; a label from a
    /// later pickup is left alone.
    pub fn consume_shield(&mut self) {
        self.shield_armed = false;
        self.shield_gen += 1;
        if self.label == Some(PowerUpKind::Shield) {
            self.label = None;
            self.label_gen += 1;
        }
    }

    /// Run every reversal due at `now`; superseded entries are dropped
    pub fn expire_due(&mut self, now: Duration) {
        let mut due = Vec::new();
        let mut rest = Vec::new();
        for reversal in self.pending.drain(..) {
            if reversal.due_at <= now {
                due.push(reversal);
            } else {
                rest.push(reversal);
            }
        }
        self.pending = rest;

        for reversal in due {
            if !self.is_current(reversal) {
                continue;
            }
            match reversal.concern {
                Concern::Label => self.label = None,
                Concern::Multiplier => self.multiplier = NORMAL_MULTIPLIER,
                Concern::Shield => self.shield_armed = false,
            }
        }
    }

    /// Session time of the earliest scheduled reversal, if any
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|r| r.due_at).min()
    }

    fn set_label(&mut self, kind: PowerUpKind, until: Duration) {
        self.label = Some(kind);
        self.label_gen += 1;
        self.pending.push(Reversal {
            concern: Concern::Label,
            stamp: self.label_gen,
            due_at: until,
        });
    }

    fn set_multiplier(&mut self, value: f64, until: Duration) {
        self.multiplier = value;
        self.multiplier_gen += 1;
        self.pending.push(Reversal {
            concern: Concern::Multiplier,
            stamp: self.multiplier_gen,
            due_at: until,
        });
    }

    fn arm_shield(&mut self, until: Duration) {
        self.shield_armed = true;
        self.shield_gen += 1;
        self.pending.push(Reversal {
            concern: Concern::Shield,
            stamp: self.shield_gen,
            due_at: until,
        });
    }

    fn is_current(&self, reversal: Reversal) -> bool {
        let current = match reversal.concern {
            Concern::Label => self.label_gen,
            Concern::Multiplier => self.multiplier_gen,
            Concern::Shield => self.shield_gen,
        };
        reversal.stamp == current
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::new()
    }
}
