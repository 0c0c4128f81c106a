//! Named field zones

use crate::geometry::{Point, Polygon};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What a zone is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ZoneRole {
    /// Resources can be collected here
    Pickup,
    /// Resources can be deposited here
    Drop,
    /// Start and end area
    Home,
    /// Must never be entered
    Forbidden,
}

/// Match side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Team {
    #[default]
    Blue,
    Yellow,
}

/// A named polygon on the field with a resource count
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    name: String,
    role: ZoneRole,
    polygon: Polygon,
    resources: u32,
    capacity: u32,
    team: Option<Team>,
    friendly: bool,
}

impl Zone {
    /// Create an empty neutral zone
    pub fn new(name: impl Into<String>, role: ZoneRole, polygon: Polygon) -> Self {
        Self {
            name: name.into(),
            role,
            polygon,
            resources: 0,
            capacity: 0,
            team: None,
            friendly: true,
        }
    }

    /// Set the starting resource count and the maximum it can hold
    pub fn with_resources(mut self, resources: u32, capacity: u32) -> Self {
        self.capacity = capacity.max(resources);
        self.resources = resources;
        self
    }

    pub fn with_team(mut self, team: Option<Team>) -> Self {
        self.team = team;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> ZoneRole {
        self.role
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn centroid(&self) -> Point {
        self.polygon.centroid()
    }

    pub fn resources(&self) -> u32 {
        self.resources
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn team(&self) -> Option<Team> {
        self.team
    }

    /// Zone belongs to our side or to nobody
    pub fn is_friendly(&self) -> bool {
        self.friendly
    }

    pub(crate) fn assign_side(&mut self, ours: Team) {
        self.friendly = self.team.map_or(true, |team| team == ours);
    }

    /// Nothing left to pick up, or no room left to drop
    pub fn is_depleted(&self) -> bool {
        match self.role {
            ZoneRole::Pickup => self.resources == 0,
            ZoneRole::Drop => self.resources >= self.capacity,
            ZoneRole::Home | ZoneRole::Forbidden => false,
        }
    }

    /// Remove up to `count` resources, returning how many were taken
    pub fn take_resources(&mut self, count: u32) -> u32 {
        let taken = count.min(self.resources);
        self.resources -= taken;
        taken
    }

    /// Add up to `count` resources, returning how many fit
    pub fn drop_resources(&mut self, count: u32) -> u32 {
        let placed = count.min(self.capacity.saturating_sub(self.resources));
        self.resources += placed;
        placed
    }
}
