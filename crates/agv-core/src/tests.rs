//! Unit tests for agv-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgvId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = AgvId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgvId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(AgvId(0) < AgvId(1));
        assert!(NodeId(100) > NodeId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgvId::INVALID.0, u32::MAX);
        assert_eq!(NodeId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
    }
}

#[cfg(test)]
mod geom {
    use std::f64::consts::PI;

    use crate::geom::{normalize_angle, to_degrees};
    use crate::Point;

    #[test]
    fn distance_345() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, -50.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        let mid = a.lerp(b, 0.5);
        assert_eq!(mid, Point::new(50.0, -25.0));
    }

    #[test]
    fn heading_cardinals() {
        let o = Point::new(0.0, 0.0);
        assert_eq!(o.heading_to(Point::new(1.0, 0.0)), 0.0);
        assert!((o.heading_to(Point::new(0.0, 1.0)) - PI / 2.0).abs() < 1e-12);
        assert!((o.heading_to(Point::new(-1.0, 0.0)) - PI).abs() < 1e-12);
    }

    #[test]
    fn advance_along_heading() {
        let o = Point::new(10.0, 10.0);
        let p = o.advance(0.0, 5.0);
        assert!((p.x - 15.0).abs() < 1e-12);
        assert!((p.y - 10.0).abs() < 1e-12);
    }

    #[test]
    fn normalize_into_half_open_range() {
        assert!((normalize_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((normalize_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-12);
        // -π maps to the open end: result is +π.
        assert!((normalize_angle(-PI) - PI).abs() < 1e-12);
        assert_eq!(normalize_angle(0.0), 0.0);
    }

    #[test]
    fn degrees() {
        assert!((to_degrees(PI) - 180.0).abs() < 1e-12);
    }
}

#[cfg(test)]
mod tick {
    use crate::Tick;

    #[test]
    fn arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(Tick(15).since(Tick(10)), 5);
    }

    #[test]
    fn display() {
        assert_eq!(Tick(42).to_string(), "T42");
    }
}

#[cfg(test)]
mod rng {
    use crate::rng::hash_seed;
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut a = SimRng::new(12345);
        let mut b = SimRng::new(12345);
        for _ in 0..200 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SimRng::new(1);
        let mut b = SimRng::new(2);
        let va: Vec<f64> = (0..8).map(|_| a.next_f64()).collect();
        let vb: Vec<f64> = (0..8).map(|_| b.next_f64()).collect();
        assert_ne!(va, vb);
    }

    #[test]
    fn output_in_unit_interval() {
        let mut rng = SimRng::new(0xDEAD_BEEF);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "out of range: {v}");
        }
    }

    #[test]
    fn hash_anchors() {
        assert_eq!(hash_seed(""), 0);
        assert_eq!(hash_seed("A"), 65);
        // h("AB") = 65*31 + 66
        assert_eq!(hash_seed("AB"), 65 * 31 + 66);
    }

    #[test]
    fn str_seed_matches_hash() {
        let mut a = SimRng::from_str_seed("warehouse-1");
        let mut b = SimRng::new(hash_seed("warehouse-1"));
        for _ in 0..32 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = SimRng::new(7);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }

    #[test]
    fn gen_index_in_bounds() {
        let mut rng = SimRng::new(99);
        for _ in 0..1000 {
            assert!(rng.gen_index(7) < 7);
        }
    }

    #[test]
    fn pick_empty_is_none() {
        let mut rng = SimRng::new(3);
        let empty: [u8; 0] = [];
        assert!(rng.pick(&empty).is_none());
        let items = [10, 20, 30];
        assert!(items.contains(rng.pick(&items).unwrap()));
    }
}

#[cfg(test)]
mod config {
    use crate::{ConfigKey, VehicleConfig};

    #[test]
    fn defaults_match_interface_contract() {
        let c = VehicleConfig::default();
        assert_eq!(c.max_speed, 1.4);
        assert_eq!(c.acceleration, 0.10);
        assert_eq!(c.deceleration, 0.15);
        assert_eq!(c.safety_distance, 35.0);
        assert_eq!(c.hard_borrow_length, 1);
    }

    #[test]
    fn set_and_get_roundtrip() {
        let mut c = VehicleConfig::default();
        c.set(ConfigKey::MaxSpeed, 2.0).unwrap();
        assert_eq!(c.get(ConfigKey::MaxSpeed), 2.0);
        c.set(ConfigKey::HardBorrowLength, 3.0).unwrap();
        assert_eq!(c.hard_borrow_length, 3);
    }

    #[test]
    fn rejects_out_of_range() {
        let mut c = VehicleConfig::default();
        assert!(c.set(ConfigKey::MaxSpeed, 0.0).is_err());
        assert!(c.set(ConfigKey::Deceleration, -0.1).is_err());
        assert!(c.set(ConfigKey::SafetyDistance, 1_000.0).is_err());
        assert!(c.set(ConfigKey::HardBorrowLength, 6.0).is_err());
        assert!(c.set(ConfigKey::HardBorrowLength, 1.5).is_err());
        // Failed sets leave the config untouched.
        assert_eq!(c, VehicleConfig::default());
    }
}
