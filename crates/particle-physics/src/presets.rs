//! Experiment presets: staged decay chains plus background particles

use crate::error::{CatalogError, Result};
use crate::particle::ParticleCatalog;

/// One spawn instruction of a decay chain.
///
/// `parent` is narration metadata; products are never linked to a live parent.
#[derive(Debug, Clone, PartialEq)]
pub struct DecayStep {
    pub parent: Option<String>,
    pub products: Vec<String>,
    /// Delay after the nominal collision instant, in milliseconds
    pub delay_ms: f32,
}

impl DecayStep {
    pub fn new(parent: Option<&str>, products: &[&str], delay_ms: f32) -> Self {
        Self {
            parent: parent.map(str::to_owned),
            products: products.iter().map(|&key| key.to_owned()).collect(),
            delay_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentPreset {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Display label, e.g. "13.6 TeV"
    pub energy: String,
    pub rarity: String,
    pub decay_chain: Vec<DecayStep>,
    pub secondary_particles: Vec<String>,
}

impl ExperimentPreset {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            description: String::new(),
            energy: String::new(),
            rarity: String::new(),
            decay_chain: Vec::new(),
            secondary_particles: Vec::new(),
        }
    }

    pub fn describe(mut self, description: &str, energy: &str, rarity: &str) -> Self {
        self.description = description.to_owned();
        self.energy = energy.to_owned();
        self.rarity = rarity.to_owned();
        self
    }

    pub fn step(mut self, parent: Option<&str>, products: &[&str], delay_ms: f32) -> Self {
        self.decay_chain.push(DecayStep::new(parent, products, delay_ms));
        self
    }

    pub fn secondaries(mut self, keys: &[&str]) -> Self {
        self.secondary_particles = keys.iter().map(|&key| key.to_owned()).collect();
        self
    }

    /// Products across all decay steps
    pub fn product_count(&self) -> usize {
        self.decay_chain.iter().map(|step| step.products.len()).sum()
    }

    /// Everything a run spawns after the collision (products and secondaries)
    pub fn total_produced(&self) -> usize {
        self.product_count() + self.secondary_particles.len()
    }

    /// Checks that every referenced type key resolves in `catalog`.
    pub fn validate(&self, catalog: &ParticleCatalog) -> Result<()> {
        let parents = self.decay_chain.iter().filter_map(|step| step.parent.as_deref());
        let products = self
            .decay_chain
            .iter()
            .flat_map(|step| step.products.iter().map(String::as_str));
        let secondaries = self.secondary_particles.iter().map(String::as_str);

        for key in parents.chain(products).chain(secondaries) {
            catalog.require(key)?;
        }
        Ok(())
    }
}

/// Ordered list of experiments offered to the user
#[derive(Debug, Clone, Default)]
pub struct PresetCatalog {
    presets: Vec<ExperimentPreset>,
}

impl PresetCatalog {
    pub fn new(presets: Vec<ExperimentPreset>) -> Self {
        Self { presets }
    }

    pub fn find(&self, id: &str) -> Result<&ExperimentPreset> {
        self.presets
            .iter()
            .find(|preset| preset.id == id)
            .ok_or_else(|| CatalogError::UnknownPreset(id.to_owned()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExperimentPreset> {
        self.presets.iter()
    }

    pub fn first(&self) -> Option<&ExperimentPreset> {
        self.presets.first()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn standard() -> Self {
        Self::new(vec![
            ExperimentPreset::new("higgs_diphoton", "Higgs → γγ")
                .describe(
                    "Higgs boson decays into two high-energy photons. The \"golden channel\" for Higgs discovery.",
                    "13.6 TeV",
                    "Rare",
                )
                .step(Some("higgs"), &["photon", "photon"], 0.0)
                .secondaries(&["jet", "jet", "muon_m", "nu_mu"]),
            ExperimentPreset::new("higgs_4lepton", "Higgs → ZZ → 4ℓ")
                .describe(
                    "Higgs decays to two Z bosons, each Z decays into a lepton pair. Cleanest Higgs signature.",
                    "13.6 TeV",
                    "Very Rare",
                )
                .step(Some("higgs"), &["Z", "Z"], 0.0)
                .step(Some("Z"), &["electron", "positron"], 200.0)
                .step(Some("Z"), &["muon_m", "muon_p"], 200.0)
                .secondaries(&["jet", "jet"]),
            ExperimentPreset::new("top_pair", "Top Quark Pair (tt̄)")
                .describe(
                    "Proton collision produces a top-antitop pair. Each decays to W boson + b-quark jet.",
                    "13.6 TeV",
                    "Common",
                )
                .step(None, &["t_quark", "t_quark"], 0.0)
                .step(Some("t_quark"), &["W_plus", "b_jet"], 150.0)
                .step(Some("t_quark"), &["W_minus", "b_jet"], 150.0)
                .step(Some("W_plus"), &["muon_p", "nu_mu"], 300.0)
                .step(Some("W_minus"), &["electron", "nu_e"], 300.0)
                .secondaries(&["jet", "pion_p", "pion_m"]),
            ExperimentPreset::new("qgp", "Quark-Gluon Plasma")
                .describe(
                    "Heavy ion collision creates a hot, dense state of matter: quark-gluon plasma. Hundreds of particles produced.",
                    "5.36 TeV/nucleon",
                    "Heavy Ion",
                )
                .step(None, &["gluon", "gluon", "gluon", "gluon"], 0.0)
                .secondaries(&[
                    "pion_p", "pion_m", "pion_p", "pion_m", "pion_p", "pion_m", "kaon", "kaon",
                    "proton", "proton", "muon_m", "muon_p", "electron", "positron", "jet", "jet",
                    "jet", "jet", "photon", "photon", "photon",
                ]),
            ExperimentPreset::new("wz_decay", "W/Z Boson Production")
                .describe(
                    "Direct W or Z boson production via Drell-Yan process. Clean leptonic decay.",
                    "13.6 TeV",
                    "Common",
                )
                .step(None, &["Z"], 0.0)
                .step(Some("Z"), &["muon_m", "muon_p"], 150.0)
                .secondaries(&["jet", "jet", "photon"]),
            ExperimentPreset::new("b_meson", "B-Meson / CP Violation")
                .describe(
                    "B-meson produced in collision oscillates between matter and antimatter states before decaying.",
                    "13.6 TeV",
                    "Specialized",
                )
                .step(None, &["b_jet", "b_jet"], 0.0)
                .step(Some("b_jet"), &["kaon", "pion_m"], 400.0)
                .step(Some("b_jet"), &["muon_m", "nu_mu"], 500.0)
                .secondaries(&["jet", "pion_p", "photon"]),
            ExperimentPreset::new("higgs_ww", "Higgs → WW → ℓνℓν")
                .describe(
                    "Higgs decays to two W bosons. Each W produces a lepton + neutrino. Butterfly pattern with missing energy.",
                    "13.6 TeV",
                    "Rare",
                )
                .step(Some("higgs"), &["W_plus", "W_minus"], 0.0)
                .step(Some("W_plus"), &["positron", "nu_e"], 180.0)
                .step(Some("W_minus"), &["muon_m", "nu_mu"], 180.0)
                .secondaries(&["jet", "jet", "photon", "pion_p", "pion_m"]),
            ExperimentPreset::new("z_to_tautau", "Z → τ⁺τ⁻ → Multi-decay")
                .describe(
                    "Z boson decays into tau pair. Each tau decays further into lighter particles, a cascade of 3 generations.",
                    "13.6 TeV",
                    "Uncommon",
                )
                .step(None, &["Z"], 0.0)
                .step(Some("Z"), &["tau_m", "tau_p"], 150.0)
                .step(Some("tau_m"), &["electron", "nu_e", "nu_tau"], 350.0)
                .step(Some("tau_p"), &["pion_p", "pion_p", "pion_m", "nu_tau"], 350.0)
                .secondaries(&["jet", "photon", "photon"]),
            ExperimentPreset::new("diphoton_shower", "e⁺e⁻ Annihilation Shower")
                .describe(
                    "Electron-positron pair annihilate into photons, which convert back into particle pairs. Matter created from pure energy.",
                    "13.6 TeV",
                    "Spectacular",
                )
                .step(None, &["electron", "positron"], 0.0)
                .step(None, &["photon", "photon"], 200.0)
                .step(None, &["muon_m", "muon_p"], 350.0)
                .step(None, &["photon", "photon", "photon"], 500.0)
                .step(None, &["electron", "positron", "electron", "positron"], 650.0)
                .secondaries(&[
                    "pion_p", "pion_m", "pion_p", "pion_m", "kaon", "photon", "photon", "nu_e",
                    "nu_mu",
                ]),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_presets_resolve_against_standard_catalog() {
        let catalog = ParticleCatalog::standard();
        let presets = PresetCatalog::standard();
        assert_eq!(presets.len(), 9);
        for preset in presets.iter() {
            preset.validate(&catalog).unwrap();
        }
    }

    #[test]
    fn higgs_diphoton_counts() {
        let presets = PresetCatalog::standard();
        let preset = presets.find("higgs_diphoton").unwrap();
        assert_eq!(preset.product_count(), 2);
        assert_eq!(preset.total_produced(), 6);
        assert_eq!(preset.decay_chain[0].parent.as_deref(), Some("higgs"));
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let presets = PresetCatalog::standard();
        assert_eq!(
            presets.find("sphaleron").unwrap_err(),
            CatalogError::UnknownPreset("sphaleron".into())
        );
    }

    #[test]
    fn validate_flags_unresolved_keys() {
        let catalog = ParticleCatalog::standard();
        let preset = ExperimentPreset::new("bad", "Bad")
            .step(None, &["photon", "graviton"], 0.0)
            .secondaries(&["jet"]);
        assert_eq!(
            preset.validate(&catalog).unwrap_err(),
            CatalogError::UnknownParticleType("graviton".into())
        );
    }
}
