use foundation::math::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::connectors::{ConnectorSet, Selection};

/// A dot travelling along one connector path.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct LineDot {
    /// Connector index while on a trip.
    pub path: Option<usize>,
    pub index: usize,
    pub visible: bool,
    pub position: Vec3,
}

impl LineDot {
    pub fn is_travelling(&self) -> bool {
        self.path.is_some()
    }
}

/// Fixed pool of travelling dots fed from the current selection.
#[derive(Debug, Clone)]
pub struct LineDots {
    dots: Vec<LineDot>,
    spawn_chance: f64,
    rng: Pcg32,
}

impl LineDots {
    pub fn new(amount: usize, spawn_chance: f64, seed: u64) -> Self {
        Self {
            dots: vec![LineDot::default(); amount],
            spawn_chance: spawn_chance.clamp(0.0, 1.0),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn dots(&self) -> &[LineDot] {
        &self.dots
    }

    pub fn visible_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.dots.iter().filter(|d| d.visible).map(|d| d.position)
    }

    /// One frame: idle dots may start a trip, travelling dots step one
    /// sample along their path, finished dots hide.
    pub fn tick(&mut self, selection: &Selection, connectors: &ConnectorSet) {
        for i in 0..self.dots.len() {
            let dot = self.dots[i];
            match dot.path.and_then(|ci| connectors.connector(ci)) {
                None => {
                    self.dots[i].path = None;
                    if !self.rng.gen_bool(self.spawn_chance) {
                        continue;
                    }
                    if let Some(ci) = self.random_connector(selection) {
                        self.dots[i].path = Some(ci);
                        self.dots[i].index = 0;
                    }
                }
                Some(connector) if dot.index + 1 < connector.path.len() => {
                    let d = &mut self.dots[i];
                    d.visible = true;
                    d.position = connector.path[dot.index];
                    d.index += 1;
                }
                Some(_) => {
                    let d = &mut self.dots[i];
                    d.visible = false;
                    d.path = None;
                }
            }
        }
    }

    /// Moves every travelling dot onto a random connector of `selection`,
    /// keeping its progress, clamped to the new path's last sample.
    pub fn reassign(&mut self, selection: &Selection, connectors: &ConnectorSet) {
        for i in 0..self.dots.len() {
            if !self.dots[i].is_travelling() {
                continue;
            }
            let next = self
                .random_connector(selection)
                .and_then(|ci| connectors.connector(ci).map(|c| (ci, c.path.len())));
            let d = &mut self.dots[i];
            match next {
                Some((ci, len)) => {
                    d.path = Some(ci);
                    d.index = d.index.min(len.saturating_sub(1));
                }
                None => {
                    d.path = None;
                    d.visible = false;
                }
            }
        }
    }

    fn random_connector(&mut self, selection: &Selection) -> Option<usize> {
        if selection.connectors.is_empty() {
            return None;
        }
        let pick = self.rng.gen_range(0..selection.connectors.len());
        Some(selection.connectors[pick])
    }
}
