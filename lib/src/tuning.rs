/// Length-band thresholds the arbitration pipeline consults when deciding whether
/// to take a Hamiltonian-cycle shortcut. `risk` scales tolerance and path-length
/// caps uniformly; `1.0` reproduces the baseline numbers, `<1.0` is more
/// conservative, `>1.0` takes more aggressive shortcuts.
///
/// Resolved from an opaque difficulty tag via [`crate::Autopilot::set_difficulty`].
/// The tag itself carries no meaning beyond selecting one of these presets — a
/// non-normative extension point, not part of the core decision contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub risk: f64,
}

impl Tuning {
    pub const fn normal() -> Self {
        Tuning { risk: 1.0 }
    }

    pub const fn easy() -> Self {
        Tuning { risk: 1.2 }
    }

    pub const fn hard() -> Self {
        Tuning { risk: 0.85 }
    }

    /// Resolves a difficulty tag to a preset. Unknown tags fall back to `normal`.
    pub fn resolve(tag: &str) -> Self {
        match tag {
            "easy" => Self::easy(),
            "hard" => Self::hard(),
            _ => Self::normal(),
        }
    }

    /// Shortcut evaluation cadence: recompute a validated shortcut every `n` ticks.
    pub fn shortcut_cadence(&self, length: usize) -> u64 {
        if length < 90 {
            1
        } else if length < 180 {
            2
        } else {
            3
        }
    }

    /// Score tolerance the shortcut must clear relative to the cycle baseline.
    pub fn shortcut_tolerance(&self, length: usize) -> f64 {
        let base = if length < 90 {
            18.0
        } else if length < 180 {
            12.0
        } else {
            8.0
        };
        base * self.risk
    }

    /// Longest shortcut path considered worth validating, by current length.
    pub fn shortcut_path_cap(&self, length: usize) -> usize {
        let base = if length < 80 {
            34.0
        } else if length < 180 {
            28.0
        } else {
            22.0
        };
        (base * self.risk).round().max(1.0) as usize
    }

    /// Minimum survival buffer (post-shortcut forward distance to the tail on the
    /// cycle) required before a shortcut is even considered.
    pub fn min_survival_buffer(&self, length: usize) -> i64 {
        (3.0_f64).max((length as f64 * 0.05).floor()) as i64
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::normal()
    }
}
