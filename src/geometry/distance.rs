use super::city::{City, CityId};
use super::Topology;

/// Dense symmetric pairwise distance table.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrix {
    data: Box<[f64]>,
    n: usize,
}

impl DistanceMatrix {
    pub fn build(cities: &[City], topology: Topology) -> Self {
        let n = cities.len();
        let mut data = vec![0.0; n * n].into_boxed_slice();
        for i in 0..n {
            for j in (i + 1)..n {
                let d = topology.distance(cities[i].position, cities[j].position);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        DistanceMatrix { data, n }
    }

    #[inline]
    pub fn get(&self, i: CityId, j: CityId) -> f64 {
        self.data[i * self.n + j]
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Length of the closed tour visiting `route` in order.
    pub fn tour_length(&self, route: &[CityId]) -> f64 {
        if route.len() < 2 {
            return 0.0;
        }
        let open: f64 = route.windows(2).map(|w| self.get(w[0], w[1])).sum();
        open + self.get(route[route.len() - 1], route[0])
    }

    /// Greedy nearest-neighbour tour from `start`.
    ///
    /// Used as a rough tour-length estimate when seeding pheromone.
    pub fn nearest_neighbor_tour(&self, start: CityId) -> Vec<CityId> {
        if self.n == 0 {
            return Vec::new();
        }
        let mut visited = vec![false; self.n];
        let mut route = Vec::with_capacity(self.n);
        let mut current = start;
        visited[current] = true;
        route.push(current);

        while route.len() < self.n {
            let next = (0..self.n)
                .filter(|&j| !visited[j])
                .min_by(|&a, &b| self.get(current, a).total_cmp(&self.get(current, b)));
            match next {
                Some(j) => {
                    visited[j] = true;
                    route.push(j);
                    current = j;
                }
                None => break,
            }
        }
        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<City> {
        vec![
            City::new(0, 0.0, 0.0),
            City::new(1, 0.0, 10.0),
            City::new(2, 10.0, 10.0),
            City::new(3, 10.0, 0.0),
        ]
    }

    #[test]
    fn symmetric_with_zero_diagonal() {
        let m = DistanceMatrix::build(&square(), Topology::Euclidean);
        for i in 0..4 {
            assert_eq!(m.get(i, i), 0.0);
            for j in 0..4 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
    }

    #[test]
    fn closed_tour_length() {
        let m = DistanceMatrix::build(&square(), Topology::Euclidean);
        assert_eq!(m.tour_length(&[0, 1, 2, 3]), 40.0);
        let crossing = m.tour_length(&[0, 2, 1, 3]);
        assert!((crossing - (20.0 + 2.0 * 200f64.sqrt())).abs() < 1e-9);
        assert_eq!(m.tour_length(&[2]), 0.0);
    }

    #[test]
    fn nearest_neighbor_visits_everything_once() {
        let cities = vec![
            City::new(0, 0.0, 0.0),
            City::new(1, 1.0, 0.0),
            City::new(2, 5.0, 0.0),
            City::new(3, 2.0, 0.0),
        ];
        let m = DistanceMatrix::build(&cities, Topology::Euclidean);
        assert_eq!(m.nearest_neighbor_tour(0), vec![0, 1, 3, 2]);
    }
}
