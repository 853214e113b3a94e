//! Game state types: phase, session statistics and the on-screen message log.

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Player alive and taking input.
    Playing,
    /// Player at zero health; a respawn is scheduled.
    Dead,
}

/// Running totals for the current life, plus deaths across the whole process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub kills: u32,
    pub deaths: u32,
    pub shots_fired: u32,
    pub shots_hit: u32,
    pub damage_dealt: f32,
    /// Seconds since the last reset.
    pub time_survived: f32,
}

impl SessionStats {
    /// Hit ratio in [0, 1]; 0 before the first shot.
    pub fn accuracy(&self) -> f32 {
        if self.shots_fired == 0 {
            0.0
        } else {
            self.shots_hit as f32 / self.shots_fired as f32
        }
    }

    /// Clear per-life counters. Deaths carry over.
    pub fn reset_for_new_life(&mut self) {
        *self = Self {
            deaths: self.deaths,
            ..Self::default()
        };
    }

    /// Format time survived as MM:SS.
    pub fn time_survived_str(&self) -> String {
        let total = self.time_survived.max(0.0) as u32;
        format!("{:02}:{:02}", total / 60, total % 60)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameMessage {
    /// Monotonic id so sinks can tell which lines they have already shown.
    pub id: u64,
    pub text: String,
    pub color: [f32; 4],
    pub time_remaining: f32,
}

/// Manages the on-screen message log displayed over the game view.
#[derive(Debug, Clone)]
pub struct GameMessages {
    pub messages: Vec<GameMessage>,
    pub max_visible: usize,
    default_duration: f32,
    next_id: u64,
}

impl Default for GameMessages {
    fn default() -> Self {
        Self::new()
    }
}

impl GameMessages {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            max_visible: 8,
            default_duration: 4.0,
            next_id: 0,
        }
    }

    pub fn push(&mut self, text: impl Into<String>, color: [f32; 4]) {
        self.messages.push(GameMessage {
            id: self.next_id,
            text: text.into(),
            color,
            time_remaining: self.default_duration,
        });
        self.next_id += 1;
        if self.messages.len() > 50 {
            self.messages.remove(0);
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(text, [1.0, 1.0, 1.0, 1.0]);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(text, [0.3, 1.0, 0.3, 1.0]);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(text, [1.0, 0.9, 0.3, 1.0]);
    }

    pub fn update(&mut self, dt: f32) {
        for msg in &mut self.messages {
            msg.time_remaining -= dt;
        }
        self.messages.retain(|m| m.time_remaining > 0.0);
    }

    /// The newest `max_visible` messages, oldest first.
    pub fn visible(&self) -> &[GameMessage] {
        let start = self.messages.len().saturating_sub(self.max_visible);
        &self.messages[start..]
    }

    /// Messages with an id at or after `id`.
    pub fn since(&self, id: u64) -> impl Iterator<Item = &GameMessage> {
        self.messages.iter().filter(move |m| m.id >= id)
    }

    /// Id the next pushed message will get.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }
}
