//! Locality registry: names and fixed coordinates.

use log::debug;
use std::collections::HashMap;

use crate::api::{Coordinates, Locality, TelemetryRecord};

/// Ordered set of known localities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalityRegistry {
    localities: Vec<Locality>,
    index: HashMap<String, usize>,
}

impl LocalityRegistry {
    pub fn new(localities: Vec<Locality>) -> Self {
        let mut registry = Self::default();
        for locality in localities {
            registry.insert(locality);
        }
        registry
    }

    /// Derive a registry from record positions: one entry per locality in
    /// first-seen order, placed at the mean latitude/longitude of its
    /// records. Localities whose records carry no position get (0, 0).
    pub fn from_records(records: &[TelemetryRecord]) -> Self {
        let mut order: Vec<&str> = Vec::new();
        let mut sums: HashMap<&str, (f64, f64, usize)> = HashMap::new();

        for record in records {
            let entry = sums.entry(record.locality.as_str()).or_insert_with(|| {
                order.push(record.locality.as_str());
                (0.0, 0.0, 0)
            });
            if let (Some(lat), Some(lon)) = (record.latitude, record.longitude) {
                entry.0 += lat;
                entry.1 += lon;
                entry.2 += 1;
            }
        }

        let localities = order
            .into_iter()
            .map(|name| {
                let (lat_sum, lon_sum, n) = sums.get(name).copied().unwrap_or((0.0, 0.0, 0));
                let coordinates = if n > 0 {
                    Coordinates::new(lat_sum / n as f64, lon_sum / n as f64)
                } else {
                    Coordinates::default()
                };
                Locality {
                    name: name.to_string(),
                    coordinates,
                }
            })
            .collect();

        Self::new(localities)
    }

    /// Insert or replace a locality. Replacing keeps its original position.
    pub fn insert(&mut self, locality: Locality) {
        match self.index.get(&locality.name) {
            Some(&i) => self.localities[i] = locality,
            None => {
                self.index.insert(locality.name.clone(), self.localities.len());
                self.localities.push(locality);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Locality> {
        self.index.get(name).map(|&i| &self.localities[i])
    }

    /// Coordinates of `name`, or (0, 0) for an unregistered locality.
    pub fn coordinates_of(&self, name: &str) -> Coordinates {
        match self.get(name) {
            Some(locality) => locality.coordinates,
            None => {
                debug!("Locality '{}' not registered, using default coordinates", name);
                Coordinates::default()
            }
        }
    }

    /// Position of `name` in registry order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn localities(&self) -> &[Locality] {
        &self.localities
    }

    pub fn len(&self) -> usize {
        self.localities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.localities.is_empty()
    }
}
