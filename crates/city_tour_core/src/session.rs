//! Click-driven editing of a [`CityGraph`].
//!
//! The prompt/selection flow is a single [`Interaction`] value, so states like
//! "naming a city while a distance prompt is open" cannot be represented.

use crate::{CityGraph, CityId, Error, HeuristicSolver, Result, Tour};

/// Minimum number of cities before a tour is searched for.
pub const MIN_TOUR_CITIES: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Interaction {
    Idle,
    /// Empty canvas was clicked; waiting for the new city's name.
    AwaitingCityName { x: f64, y: f64 },
    /// A city was clicked; the next city click picks the other endpoint.
    SelectingTarget { from: CityId },
    /// Both endpoints chosen; waiting for the connection distance.
    AwaitingDistanceInput { from: CityId, to: CityId },
}

impl Interaction {
    fn is_prompt(&self) -> bool {
        matches!(
            self,
            Self::AwaitingCityName { .. } | Self::AwaitingDistanceInput { .. }
        )
    }
}

/// Graph plus interaction state plus the last computed tour.
///
/// Any graph mutation made through the session drops the cached tour.
#[derive(Clone, Debug)]
pub struct Session {
    graph: CityGraph,
    interaction: Interaction,
    selected: Option<CityId>,
    solution: Option<Tour>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(CityGraph::new())
    }
}

impl Session {
    pub fn new(graph: CityGraph) -> Self {
        Self {
            graph,
            interaction: Interaction::Idle,
            selected: None,
            solution: None,
        }
    }

    pub fn graph(&self) -> &CityGraph {
        &self.graph
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn selected(&self) -> Option<CityId> {
        self.selected
    }

    pub fn solution(&self) -> Option<&Tour> {
        self.solution.as_ref()
    }

    /// Click on the canvas: hits a city within the click radius, otherwise
    /// opens the naming prompt at that point. Ignored while a prompt is open.
    pub fn click_canvas(&mut self, x: f64, y: f64) -> Interaction {
        if self.interaction.is_prompt() {
            return self.interaction;
        }
        match self.graph.city_at(x, y).map(|c| c.id) {
            Some(id) => self.click_city(id),
            None => {
                self.interaction = Interaction::AwaitingCityName { x, y };
                self.interaction
            }
        }
    }

    /// Click on a city: select it as a source, cancel if it already is one,
    /// or ask for a distance to connect the two.
    pub fn click_city(&mut self, id: CityId) -> Interaction {
        if self.interaction.is_prompt() || !self.graph.contains(id) {
            return self.interaction;
        }
        self.interaction = match self.interaction {
            Interaction::SelectingTarget { from } if from == id => Interaction::Idle,
            Interaction::SelectingTarget { from } => Interaction::AwaitingDistanceInput { from, to: id },
            _ => {
                self.selected = Some(id);
                Interaction::SelectingTarget { from: id }
            }
        };
        self.interaction
    }

    /// Answers the naming prompt. On error the prompt stays open.
    pub fn submit_city_name(&mut self, name: &str) -> Result<CityId> {
        let Interaction::AwaitingCityName { x, y } = self.interaction else {
            return Err(Error::invalid_input("no city name prompt is open"));
        };
        let id = self.graph.add_city(name, x, y)?;
        self.interaction = Interaction::Idle;
        self.invalidate();
        Ok(id)
    }

    /// Answers the distance prompt with raw user text. On error the prompt
    /// stays open.
    pub fn submit_distance(&mut self, raw: &str) -> Result<()> {
        let Interaction::AwaitingDistanceInput { from, to } = self.interaction else {
            return Err(Error::invalid_input("no distance prompt is open"));
        };
        let distance: f64 = raw
            .trim()
            .parse()
            .map_err(|_| Error::validation(format!("invalid distance: {raw}")))?;
        self.graph.connect(from, to, distance)?;
        self.interaction = Interaction::Idle;
        self.invalidate();
        Ok(())
    }

    /// Escape: close any prompt, drop the selection.
    pub fn cancel(&mut self) {
        self.interaction = Interaction::Idle;
        self.selected = None;
    }

    pub fn remove_city(&mut self, id: CityId) -> Result<()> {
        self.graph.remove_city(id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        let involved = match self.interaction {
            Interaction::SelectingTarget { from } => from == id,
            Interaction::AwaitingDistanceInput { from, to } => from == id || to == id,
            _ => false,
        };
        if involved {
            self.interaction = Interaction::Idle;
        }
        self.invalidate();
        Ok(())
    }

    pub fn remove_connection(&mut self, a: CityId, b: CityId) -> Option<f64> {
        let removed = self.graph.disconnect(a, b);
        if removed.is_some() {
            self.invalidate();
        }
        removed
    }

    pub fn clear_all(&mut self) {
        self.graph.clear();
        self.interaction = Interaction::Idle;
        self.selected = None;
        self.invalidate();
    }

    /// Runs the nearest-neighbor solver on the current graph and caches the tour.
    pub fn find_shortest_path(&mut self) -> Result<&Tour> {
        if self.graph.len() < MIN_TOUR_CITIES {
            return Err(Error::validation(format!(
                "add at least {MIN_TOUR_CITIES} connected cities first, got {}",
                self.graph.len()
            )));
        }
        self.solution = None;
        let tour = HeuristicSolver::new(&self.graph).solve()?;
        Ok(self.solution.insert(tour))
    }

    fn invalidate(&mut self) {
        if self.solution.take().is_some() {
            log::debug!("session: cached tour dropped revision={}", self.graph.revision());
        }
    }
}
