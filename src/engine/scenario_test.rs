#[cfg(test)]
mod tests {
    use crate::core::config::{AcoParam, EngineConfig};
    use crate::core::error::EngineError;
    use crate::engine::{AcoEngine, ForagingSimulation, SimulationState};
    use crate::geometry::{Bounds, CitySet, Point, Topology};

    fn tsp(points: &[(f64, f64)], seed: u64) -> AcoEngine {
        let mut engine = AcoEngine::seeded(seed).expect("default config is valid");
        for &(x, y) in points {
            engine.add_city(x, y).unwrap();
        }
        engine
    }

    #[test]
    fn square_reaches_its_perimeter() {
        let mut engine = tsp(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)], 2024);
        engine.initialize_colony(20, 50, 0.1, 1.0, 2.0).unwrap();

        for generation in 1..=50 {
            let more = engine.run_iteration().unwrap();
            assert_eq!(more, generation < 50);
        }

        assert_eq!(engine.get_generation(), 50);
        assert!(engine.is_complete());
        assert!((engine.get_best_distance().unwrap() - 40.0).abs() < 1e-9);
        let mut route = engine.get_best_route();
        route.sort_unstable();
        assert_eq!(route, vec![0, 1, 2, 3]);
    }

    #[test]
    fn run_before_initialize_is_rejected() {
        let mut engine = tsp(&[(0.0, 0.0), (5.0, 5.0), (9.0, 1.0)], 1);
        let err = engine.run_iteration().unwrap_err();
        assert!(matches!(err, EngineError::NotInitialized(_)));
    }

    #[test]
    fn too_few_cities_is_invalid_input() {
        let mut engine = tsp(&[(0.0, 0.0), (5.0, 5.0)], 1);
        let err = engine.initialize_colony(10, 10, 0.1, 1.0, 2.0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn clear_cities_resets_everything() {
        let mut engine = tsp(&[(0.0, 0.0), (5.0, 5.0), (9.0, 1.0), (2.0, 8.0)], 5);
        engine.initialize_colony(5, 10, 0.1, 1.0, 2.0).unwrap();
        engine.run_iteration().unwrap();
        engine.run_iteration().unwrap();
        assert!(engine.get_best_distance().is_some());

        engine.clear_cities();
        assert_eq!(engine.get_city_count(), 0);
        assert_eq!(engine.get_generation(), 0);
        assert_eq!(engine.get_best_distance(), None);
        assert!(engine.get_best_route().is_empty());
    }

    #[test]
    fn greedy_ant_follows_nearest_neighbour() {
        let points = [(0.0, 0.0), (1.0, 0.0), (3.0, 0.0), (7.0, 0.0), (15.0, 0.0)];
        let mut engine = tsp(&points, 77);
        engine.initialize_colony(1, 20, 0.01, 1.0, 10.0).unwrap();
        while engine.run_iteration().unwrap() {}

        let mut set = CitySet::new(Topology::Euclidean);
        for &(x, y) in &points {
            set.add(x, y).unwrap();
        }
        let greedy = set.distances().nearest_neighbor_tour(0);
        let greedy_length = set.distances().tour_length(&greedy);

        assert_eq!(engine.get_best_route(), greedy);
        assert!((engine.get_best_distance().unwrap() - greedy_length).abs() < 1e-9);
    }

    #[test]
    fn same_seed_same_result() {
        let points = [(10.0, 20.0), (200.0, 40.0), (120.0, 300.0), (400.0, 220.0), (60.0, 500.0), (700.0, 90.0)];
        let run = |seed| {
            let mut engine = tsp(&points, seed);
            engine.initialize_colony(8, 15, 0.2, 1.0, 2.0).unwrap();
            while engine.run_iteration().unwrap() {}
            (engine.get_best_route(), engine.get_best_distance())
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn torus_tour_is_shorter_across_edges() {
        let points = [(10.0, 300.0), (790.0, 300.0), (10.0, 10.0), (790.0, 590.0)];
        let mut plain = tsp(&points, 4);
        plain.initialize_colony(10, 20, 0.1, 1.0, 2.0).unwrap();
        while plain.run_iteration().unwrap() {}

        let mut wrapped = tsp(&points, 4);
        wrapped.set_torus_mode(true);
        wrapped.initialize_colony(10, 20, 0.1, 1.0, 2.0).unwrap();
        while wrapped.run_iteration().unwrap() {}

        assert!(wrapped.get_best_distance().unwrap() < plain.get_best_distance().unwrap());
        assert!(wrapped.distance(0, 1).unwrap() < plain.distance(0, 1).unwrap());
    }

    #[test]
    fn foraging_colony_brings_food_home() {
        let mut config = EngineConfig::default().with_seed(8);
        config.foraging.ant_speed = 6.0;
        let mut sim = ForagingSimulation::new(&config).unwrap();
        sim.add_food_source_with_quantity(600.0, 300.0, 10.0).unwrap();
        sim.set_aco_param("num_ants", 5.0).unwrap();
        assert!(sim.start_simulation().unwrap());
        assert_eq!(sim.get_stats().ants_count, 5);

        for _ in 0..50_000 {
            sim.step_simulation();
            if sim.get_stats().best_distance > 0.0 {
                break;
            }
        }

        let stats = sim.get_stats();
        assert!(stats.best_distance > 0.0, "nothing collected after {} ticks", stats.iteration);
        assert!(sim.world().food()[0].remaining < 10.0);
        assert_eq!(stats.state, SimulationState::Running);
        assert!(sim.world().field().max_level() > 0.0);
    }

    #[test]
    fn live_ant_count_reshapes_running_colony() {
        let mut sim = ForagingSimulation::new(&EngineConfig::default().with_seed(3)).unwrap();
        sim.add_city(600.0, 300.0).unwrap();
        sim.start_simulation().unwrap();
        sim.step_simulation();

        sim.set_param(AcoParam::NumAnts, 30.0).unwrap();
        assert_eq!(sim.get_stats().ants_count, 30);
        sim.set_param(AcoParam::NumAnts, 4.0).unwrap();
        assert_eq!(sim.get_stats().ants_count, 4);
        assert!(sim.set_aco_param("num_ants", 501.0).is_err());
        assert_eq!(sim.get_stats().ants_count, 4);
    }

    #[test]
    fn torus_distance_beats_euclidean_at_the_seam() {
        let bounds = Bounds::new(800.0, 600.0);
        let a = Point::new(2.0, 150.0);
        let b = Point::new(798.0, 150.0);
        assert!(Topology::Torus(bounds).distance(a, b) < Topology::Euclidean.distance(a, b));

        let mut sim = ForagingSimulation::new(&EngineConfig::default().with_seed(3)).unwrap();
        sim.set_torus_mode(true);
        assert!(sim.world().topology().is_torus());
        assert!(sim.world().field().wraps());
    }
}
