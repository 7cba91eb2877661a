//! End-to-end scenarios for experiment runs.

use approx::assert_relative_eq;
use glam::Vec3;
use particle_physics::{ExperimentPreset, KinematicsParams, ParticleCatalog, PresetCatalog, ScriptedSampler};
use particle_simulation::{ParticleId, ParticleSimulation, SimEvent, SimParams};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

const FRAME: f32 = 0.01;

fn seeded(seed: u64) -> ParticleSimulation {
    ParticleSimulation::with_seed(ParticleCatalog::standard(), seed)
}

fn record(sim: &mut ParticleSimulation) -> Rc<RefCell<Vec<(f32, SimEvent)>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    // Events carry no timestamp; tag them with a shared clock updated by the test loop.
    sim.subscribe(move |event: &SimEvent| sink.borrow_mut().push((f32::NAN, event.clone())));
    log
}

/// Tick until `wall_seconds` have passed, stamping new events with the session clock.
fn run_for(sim: &mut ParticleSimulation, log: &Rc<RefCell<Vec<(f32, SimEvent)>>>, wall_seconds: f32) {
    let ticks = (wall_seconds / FRAME).round() as usize;
    for _ in 0..ticks {
        sim.tick(FRAME);
        let now = sim.elapsed_ms();
        for entry in log.borrow_mut().iter_mut().rev() {
            if !entry.0.is_nan() {
                break;
            }
            entry.0 = now;
        }
    }
}

fn higgs_diphoton() -> ExperimentPreset {
    PresetCatalog::standard().find("higgs_diphoton").unwrap().clone()
}

#[test]
fn run_spawns_beams_products_and_secondaries() {
    let presets = PresetCatalog::standard();
    for preset in presets.iter() {
        let mut sim = seeded(11);
        let collision = sim.run(preset);
        assert_eq!(collision, 1300.0);
        assert_eq!(
            sim.len(),
            2 + preset.product_count() + preset.secondary_particles.len(),
            "preset {}",
            preset.id
        );
    }
}

#[test]
fn higgs_to_two_photons() {
    let mut sim = seeded(42);
    let log = record(&mut sim);
    let preset = higgs_diphoton();
    assert_eq!(sim.run(&preset), 1300.0);
    assert_eq!(sim.len(), 8);

    let created: Vec<(ParticleId, String)> = log
        .borrow()
        .iter()
        .filter_map(|(_, event)| match event {
            SimEvent::ParticleCreated(created) => Some((created.id, created.type_key.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(created.len(), 8);
    assert_eq!(&created[0].1, "proton");
    assert_eq!(&created[1].1, "proton");
    let photons: Vec<ParticleId> = created
        .iter()
        .filter(|(_, key)| key == "photon")
        .map(|(id, _)| *id)
        .collect();
    assert_eq!(photons.len(), 2);

    let initial: HashMap<ParticleId, Vec3> = photons
        .iter()
        .map(|id| (*id, sim.particle(*id).unwrap().velocity()))
        .collect();

    // Both photons appear at the collision instant
    run_for(&mut sim, &log, 1.29);
    for id in &photons {
        assert!(sim.particle(*id).unwrap().is_dormant());
    }
    run_for(&mut sim, &log, 0.02);
    for id in &photons {
        let photon = sim.particle(*id).unwrap();
        assert!(photon.is_visible());
        assert_eq!(photon.delay_ms(), 0.0);
    }
    let activations: Vec<f32> = log
        .borrow()
        .iter()
        .filter_map(|(at, event)| match event {
            SimEvent::ParticleActivated { id } if photons.contains(id) => Some(*at),
            _ => None,
        })
        .collect();
    assert_eq!(activations.len(), 2);
    for at in activations {
        // accumulated f32 frame time drifts slightly from whole milliseconds
        assert!((1299.0..=1311.0).contains(&at), "activated at {at}");
    }

    // Neutral: no curvature for as long as they live
    for _ in 0..60 {
        sim.tick(FRAME);
        for id in &photons {
            if let Some(photon) = sim.particle(*id).filter(|p| p.is_alive()) {
                assert_eq!(photon.velocity(), initial[id]);
            }
        }
    }
}

#[test]
fn dormant_entities_stay_frozen_and_dark() {
    let mut sim = seeded(3);
    let log = record(&mut sim);
    sim.run(&higgs_diphoton());

    run_for(&mut sim, &log, 1.2);
    for particle in sim.particles().iter().filter(|p| !p.is_beam()) {
        assert!(particle.is_dormant());
        assert_eq!(particle.position(), Vec3::ZERO);
        assert!(particle.trail().is_empty());
        assert!(!particle.is_visible());
        assert_eq!(sim.crossed_layers().layers_of(particle.id()), 0);
    }
    let hits = log
        .borrow()
        .iter()
        .filter(|(_, event)| matches!(event, SimEvent::LayerHit(_)))
        .count();
    assert_eq!(hits, 0);
}

#[test]
fn beams_are_visible_immediately_and_straight() {
    let mut sim = seeded(5);
    sim.run(&higgs_diphoton());
    let beams: Vec<_> = sim.particles().iter().filter(|p| p.is_beam()).collect();
    assert_eq!(beams.len(), 2);
    for beam in &beams {
        assert!(beam.is_visible());
        assert_eq!(beam.energy(), 6800.0);
        assert_eq!(beam.velocity().x, 0.0);
        assert_eq!(beam.velocity().y, 0.0);
        assert_relative_eq!(beam.position().z.abs(), 25.0);
        // Heading for the vertex
        assert!(beam.position().z * beam.velocity().z < 0.0);
    }
}

#[test]
fn same_seed_same_event() {
    let preset = PresetCatalog::standard().find("top_pair").unwrap().clone();
    let mut a = seeded(99);
    let mut b = seeded(99);
    a.run(&preset);
    b.run(&preset);
    for _ in 0..200 {
        a.tick(FRAME);
        b.tick(FRAME);
    }
    let snapshot = |sim: &ParticleSimulation| {
        sim.particles()
            .iter()
            .map(|p| (p.id(), p.position(), p.velocity(), p.delay_ms()))
            .collect::<Vec<_>>()
    };
    assert_eq!(snapshot(&a), snapshot(&b));
}

#[test]
fn doubling_speed_halves_activation_time() {
    let preset = PresetCatalog::standard().find("higgs_4lepton").unwrap().clone();

    let activation_ticks = |speed: f32| {
        let mut sim = seeded(7);
        sim.set_speed(speed);
        let activated = Rc::new(RefCell::new(HashMap::new()));
        let tick = Rc::new(RefCell::new(0usize));
        let (sink, clock) = (Rc::clone(&activated), Rc::clone(&tick));
        sim.subscribe(move |event: &SimEvent| {
            if let SimEvent::ParticleActivated { id } = event {
                sink.borrow_mut().insert(*id, *clock.borrow());
            }
        });
        sim.run(&preset);
        for _ in 0..400 {
            *tick.borrow_mut() += 1;
            sim.tick(FRAME);
        }
        let result = activated.borrow().clone();
        result
    };

    let normal = activation_ticks(1.0);
    let fast = activation_ticks(2.0);
    // beams are visible from the start and never activate
    assert_eq!(normal.len(), preset.total_produced());
    assert_eq!(normal.len(), fast.len());

    for (id, &t1) in &normal {
        let t2 = fast[id] as f32;
        assert!((t2 - t1 as f32 / 2.0).abs() <= 1.0, "{id}: {t1} vs {t2}");
    }
    for (a, &ta) in &fast {
        for (b, &tb) in &fast {
            if ta < tb {
                assert!(normal[a] <= normal[b]);
            }
        }
    }
}

#[test]
fn trails_never_exceed_capacity() {
    let mut sim = ParticleSimulation::with_sampler(
        ParticleCatalog::standard(),
        Box::new(ScriptedSampler::constant(0.5)),
    );
    // 15 units/s along x reaches the radial limit after ~1.07s
    let id = sim.spawn("photon", Vec3::ZERO, Vec3::X, 50.0, 0.0).unwrap();
    let mut previous_oldest = None;
    for tick in 0..500 {
        sim.tick(0.002);
        let Some(p) = sim.particle(id).filter(|p| p.is_alive()) else {
            break;
        };
        assert!(p.trail().len() <= 150);
        if tick >= 150 {
            assert_eq!(p.trail().len(), 150);
            let oldest = p.trail().oldest().unwrap();
            if let Some(prev) = previous_oldest {
                // FIFO: the tail keeps advancing along the track
                assert!(oldest.x > prev);
            }
            previous_oldest = Some(oldest.x);
        }
    }
    assert!(previous_oldest.is_some());
}

#[test]
fn each_layer_fires_once_per_particle() {
    let mut sim = ParticleSimulation::with_sampler(
        ParticleCatalog::standard(),
        Box::new(ScriptedSampler::constant(0.5)),
    );
    let log = record(&mut sim);
    // 15 units/s with 5ms frames: several frames inside each ±0.3 band
    let id = sim.spawn("photon", Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0), 50.0, 0.0).unwrap();
    for _ in 0..300 {
        sim.tick(0.005);
    }

    let hits: Vec<(usize, String)> = log
        .borrow()
        .iter()
        .filter_map(|(_, event)| match event {
            SimEvent::LayerHit(hit) if hit.id == id => Some((hit.layer_index, hit.layer.abbr.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        hits,
        vec![
            (0, "TRACKER".to_owned()),
            (1, "ECAL".to_owned()),
            (2, "HCAL".to_owned()),
            (3, "MUON".to_owned()),
        ]
    );
}

#[test]
fn curling_back_into_a_layer_does_not_fire_it_again() {
    // Strong field: the electron circles with radius ~0.67 around r = 1.58,
    // sweeping in and out of the tracker band at r = 2 ± 0.3.
    let params = SimParams {
        kinematics: KinematicsParams {
            magnetic_field: 100.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut sim = ParticleSimulation::with_sampler(
        ParticleCatalog::standard(),
        Box::new(ScriptedSampler::constant(0.5)),
    )
    .with_params(params);
    let log = record(&mut sim);
    let id = sim.spawn("electron", Vec3::new(2.25, 0.0, 0.0), Vec3::Y, 30.0, 0.0).unwrap();

    let tracker = sim.params().layers[0].clone();
    let tolerance = sim.params().crossing_tolerance;
    let mut inside = false;
    let mut entries = 0;
    for _ in 0..1500 {
        sim.tick(0.001);
        let r = sim.particle(id).unwrap().transverse_radius();
        let now_inside = tracker.contains_radius(r, tolerance);
        if now_inside && !inside {
            entries += 1;
        }
        inside = now_inside;
    }
    assert!(sim.particle(id).unwrap().is_alive());
    assert!(entries >= 2, "band entered {entries} times");

    let tracker_hits = log
        .borrow()
        .iter()
        .filter(|(_, event)| matches!(event, SimEvent::LayerHit(hit) if hit.id == id && hit.layer_index == 0))
        .count();
    assert_eq!(tracker_hits, 1);
}

#[test]
fn beams_never_register_hits() {
    let mut sim = seeded(1);
    let log = record(&mut sim);
    sim.spawn("proton", Vec3::new(0.0, 0.0, 0.0), Vec3::X, 6800.0, 0.0);
    run_for(&mut sim, &log, 1.5);
    let hits = log
        .borrow()
        .iter()
        .filter(|(_, event)| matches!(event, SimEvent::LayerHit(_)))
        .count();
    assert_eq!(hits, 0);
}

#[test]
fn expired_entities_are_released_within_the_fade_window() {
    let mut sim = ParticleSimulation::with_sampler(
        ParticleCatalog::standard(),
        Box::new(ScriptedSampler::constant(0.5)),
    );
    let log = record(&mut sim);
    let id = sim.spawn("photon", Vec3::ZERO, Vec3::Y, 50.0, 0.0).unwrap();

    let mut died_at = None;
    for tick in 0..400 {
        sim.tick(FRAME);
        if died_at.is_none() && !sim.particle(id).unwrap().is_alive() {
            died_at = Some(tick);
            let p = sim.particle(id).unwrap();
            assert!(p.transverse_radius() > 16.0);
            // overshoot is at most one frame of travel
            assert!(p.transverse_radius() < 16.0 + 15.0 * FRAME + 1e-3);
        }
        if sim.particle(id).is_none() {
            let died_at = died_at.unwrap();
            let fade_ticks = tick - died_at;
            assert!(fade_ticks as f32 * FRAME <= 2.0 + FRAME);
            break;
        }
    }
    assert!(sim.particle(id).is_none());
    assert_eq!(sim.resources().outstanding(), 0);

    let events = log.borrow();
    let expired = events
        .iter()
        .filter(|(_, e)| matches!(e, SimEvent::ParticleExpired { id: x, .. } if *x == id))
        .count();
    let released = events
        .iter()
        .filter(|(_, e)| matches!(e, SimEvent::ResourcesReleased { id: x } if *x == id))
        .count();
    assert_eq!((expired, released), (1, 1));
}

#[test]
fn clear_mid_fade_leaks_nothing() {
    let mut sim = seeded(8);
    let log = record(&mut sim);
    sim.run(&PresetCatalog::standard().find("qgp").unwrap().clone());
    // Beams expire on their first tick (they start beyond |z| = 14) and are fading now
    run_for(&mut sim, &log, 0.5);
    assert!(sim.particles().iter().any(|p| !p.is_alive()));
    assert!(sim.particles().iter().any(|p| p.is_dormant()));

    sim.clear();
    assert_eq!(sim.resources().outstanding(), 0);
    assert!(sim.crossed_layers().is_empty());

    // Ticking after a clear is harmless
    run_for(&mut sim, &log, 3.0);
    let released: Vec<ParticleId> = log
        .borrow()
        .iter()
        .filter_map(|(_, e)| match e {
            SimEvent::ResourcesReleased { id } => Some(*id),
            _ => None,
        })
        .collect();
    let mut unique = released.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(released.len(), unique.len());
    assert_eq!(released.len() as u64, sim.resources().allocated());
}

#[test]
fn rerun_resets_state() {
    let mut sim = seeded(21);
    let preset = higgs_diphoton();
    sim.run(&preset);
    for _ in 0..250 {
        sim.tick(FRAME);
    }
    sim.run(&preset);
    assert_eq!(sim.elapsed(), 0.0);
    assert_eq!(sim.len(), 8);
    assert!(sim.crossed_layers().is_empty());
    assert_eq!(sim.resources().outstanding(), 8);
}

#[test]
fn unresolved_keys_are_skipped() {
    let mut sim = seeded(2);
    let preset = ExperimentPreset::new("odd", "Odd")
        .step(Some("higgs"), &["photon", "graviton"], 0.0)
        .secondaries(&["axion", "jet"]);
    sim.run(&preset);
    assert_eq!(sim.len(), 2 + 1 + 1);
}
