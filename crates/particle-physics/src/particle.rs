//! Particle kinds and the type catalog

use crate::error::{CatalogError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Coarse classification shown in the particle detail card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Boson,
    Lepton,
    Quark,
    Baryon,
    Meson,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Boson => "Boson",
            Category::Lepton => "Lepton",
            Category::Quark => "Quark",
            Category::Baryon => "Baryon",
            Category::Meson => "Meson",
        }
    }
}

/// How a particle's track is drawn; also selects kinematic tweaks
/// (curvature scaling, jet absorption, lifetime budget).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrailStyle {
    Straight,
    Spiral,
    Short,
    Flash,
    HelixTight,
    HelixWide,
    Dashed,
    Jet,
    Beam,
}

impl TrailStyle {
    pub fn is_beam(self) -> bool {
        self == TrailStyle::Beam
    }

    /// Short-lived resonances that only flash near the vertex
    pub fn is_short_lived(self) -> bool {
        matches!(self, TrailStyle::Short | TrailStyle::Flash)
    }
}

/// Lifetime annotation. Decay times are display text only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lifetime {
    Stable,
    Decays(String),
}

impl Lifetime {
    pub fn decays(annotation: impl Into<String>) -> Self {
        Lifetime::Decays(annotation.into())
    }

    pub fn is_stable(&self) -> bool {
        matches!(self, Lifetime::Stable)
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifetime::Stable => f.write_str("stable"),
            Lifetime::Decays(text) => f.write_str(text),
        }
    }
}

/// Immutable description of a particle kind, shared by every instance of it
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleTypeDef {
    pub symbol: String,
    pub name: String,
    /// Rest mass in GeV (0 for massless)
    pub mass: f32,
    /// Electric charge in units of e (fractional for quarks)
    pub charge: f32,
    pub spin: f32,
    pub lifetime: Lifetime,
    pub category: Category,
    /// 0xRRGGBB
    pub color: u32,
    pub trail: TrailStyle,
}

impl ParticleTypeDef {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: &str,
        name: &str,
        mass: f32,
        charge: f32,
        spin: f32,
        lifetime: Lifetime,
        category: Category,
        color: u32,
        trail: TrailStyle,
    ) -> Self {
        Self {
            symbol: symbol.to_owned(),
            name: name.to_owned(),
            mass,
            charge,
            spin,
            lifetime,
            category,
            color,
            trail,
        }
    }

    pub fn is_charged(&self) -> bool {
        self.charge != 0.0
    }

    pub fn is_massless(&self) -> bool {
        self.mass == 0.0
    }

    /// Color as `#rrggbb`
    pub fn hex_color(&self) -> String {
        format!("#{:06x}", self.color & 0xFF_FFFF)
    }

    /// Rest mass as shown in the detail card
    pub fn mass_label(&self) -> String {
        if self.is_massless() {
            "0 (massless)".to_owned()
        } else {
            format!("{} GeV/c²", self.mass)
        }
    }

    /// Signed charge; quark charges are written in thirds
    pub fn charge_label(&self) -> String {
        if !self.is_charged() {
            return "0".to_owned();
        }
        let sign = if self.charge > 0.0 { "+" } else { "-" };
        let thirds = (self.charge * 3.0).round();
        if (self.charge * 3.0 - thirds).abs() < 1e-4 && thirds % 3.0 != 0.0 {
            format!("{}{}/3", sign, thirds.abs())
        } else {
            format!("{}{}", sign, self.charge.abs())
        }
    }

    /// One-line summary of every property in the detail card
    pub fn detail(&self) -> String {
        format!(
            "{} {} | mass {} | charge {} | spin {} | lifetime {} | {} | {}",
            self.symbol,
            self.name,
            self.mass_label(),
            self.charge_label(),
            self.spin,
            self.lifetime,
            self.category.label(),
            self.hex_color()
        )
    }

    /// Color as normalized RGB components
    pub fn rgb(&self) -> [f32; 3] {
        [
            ((self.color >> 16) & 0xFF) as f32 / 255.0,
            ((self.color >> 8) & 0xFF) as f32 / 255.0,
            (self.color & 0xFF) as f32 / 255.0,
        ]
    }
}

/// Keyed, read-only table of particle kinds
#[derive(Debug, Clone, Default)]
pub struct ParticleCatalog {
    types: HashMap<String, Arc<ParticleTypeDef>>,
}

impl ParticleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, def: ParticleTypeDef) {
        self.types.insert(key.into(), Arc::new(def));
    }

    pub fn with(mut self, key: impl Into<String>, def: ParticleTypeDef) -> Self {
        self.insert(key, def);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Arc<ParticleTypeDef>> {
        self.types.get(key)
    }

    pub fn require(&self, key: &str) -> Result<&Arc<ParticleTypeDef>> {
        self.get(key)
            .ok_or_else(|| CatalogError::UnknownParticleType(key.to_owned()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.types.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// The Standard Model zoo shown by the event display
    pub fn standard() -> Self {
        use Category::*;
        use TrailStyle::*;

        let stable = || Lifetime::Stable;
        let d = Lifetime::decays;

        Self::new()
            // Bosons
            .with("photon", ParticleTypeDef::new("γ", "Photon", 0.0, 0.0, 1.0, stable(), Boson, 0xffd700, Straight))
            .with("gluon", ParticleTypeDef::new("g", "Gluon", 0.0, 0.0, 1.0, stable(), Boson, 0xff8800, Spiral))
            .with("W_plus", ParticleTypeDef::new("W⁺", "W⁺ Boson", 80.4, 1.0, 1.0, d("3×10⁻²⁵s"), Boson, 0xff00ff, Short))
            .with("W_minus", ParticleTypeDef::new("W⁻", "W⁻ Boson", 80.4, -1.0, 1.0, d("3×10⁻²⁵s"), Boson, 0xff00ff, Short))
            .with("Z", ParticleTypeDef::new("Z⁰", "Z Boson", 91.2, 0.0, 1.0, d("3×10⁻²⁵s"), Boson, 0xff00ff, Short))
            .with("higgs", ParticleTypeDef::new("H", "Higgs Boson", 125.1, 0.0, 0.0, d("1.6×10⁻²²s"), Boson, 0xfffacd, Flash))
            // Leptons
            .with("electron", ParticleTypeDef::new("e⁻", "Electron", 0.000511, -1.0, 0.5, stable(), Lepton, 0x00bfff, HelixTight))
            .with("positron", ParticleTypeDef::new("e⁺", "Positron", 0.000511, 1.0, 0.5, stable(), Lepton, 0x00bfff, HelixTight))
            .with("muon_m", ParticleTypeDef::new("μ⁻", "Muon", 0.1057, -1.0, 0.5, d("2.2×10⁻⁶s"), Lepton, 0x00ff88, HelixWide))
            .with("muon_p", ParticleTypeDef::new("μ⁺", "Antimuon", 0.1057, 1.0, 0.5, d("2.2×10⁻⁶s"), Lepton, 0x00ff88, HelixWide))
            .with("tau_m", ParticleTypeDef::new("τ⁻", "Tau", 1.777, -1.0, 0.5, d("2.9×10⁻¹³s"), Lepton, 0x00ccaa, Short))
            .with("tau_p", ParticleTypeDef::new("τ⁺", "Antitau", 1.777, 1.0, 0.5, d("2.9×10⁻¹³s"), Lepton, 0x00ccaa, Short))
            .with("nu_e", ParticleTypeDef::new("νₑ", "Electron Neutrino", 0.0, 0.0, 0.5, stable(), Lepton, 0xaa66ff, Dashed))
            .with("nu_mu", ParticleTypeDef::new("νμ", "Muon Neutrino", 0.0, 0.0, 0.5, stable(), Lepton, 0xaa66ff, Dashed))
            .with("nu_tau", ParticleTypeDef::new("ντ", "Tau Neutrino", 0.0, 0.0, 0.5, stable(), Lepton, 0xaa66ff, Dashed))
            // Quarks, observed as jets
            .with("b_jet", ParticleTypeDef::new("b", "b-quark jet", 4.18, -1.0 / 3.0, 0.5, d("~10⁻¹²s"), Quark, 0xff4444, Jet))
            .with("t_quark", ParticleTypeDef::new("t", "Top Quark", 173.0, 2.0 / 3.0, 0.5, d("5×10⁻²⁵s"), Quark, 0xff6666, Short))
            .with("jet", ParticleTypeDef::new("jet", "Hadron Jet", 0.0, 0.0, 0.0, d("n/a"), Quark, 0xff4444, Jet))
            // Composites
            .with("proton", ParticleTypeDef::new("p", "Proton", 0.9383, 1.0, 0.5, stable(), Baryon, 0xffffff, Beam))
            .with("pion_p", ParticleTypeDef::new("π⁺", "Pion+", 0.1396, 1.0, 0.0, d("2.6×10⁻⁸s"), Meson, 0xffaa44, HelixTight))
            .with("pion_m", ParticleTypeDef::new("π⁻", "Pion-", 0.1396, -1.0, 0.0, d("2.6×10⁻⁸s"), Meson, 0xffaa44, HelixTight))
            .with("kaon", ParticleTypeDef::new("K", "Kaon", 0.4937, 1.0, 0.0, d("1.2×10⁻⁸s"), Meson, 0xddaa00, HelixWide))
    }
}
