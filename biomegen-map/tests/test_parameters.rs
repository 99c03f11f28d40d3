use biomegen_map::{MapError, MapParameters};

#[test]
fn accepts_the_documented_ranges() {

    let params = MapParameters::validated(500, 10000, 50, 1000, 10, 0, 1).unwrap();
    assert_eq!(params.n_seeds(), 500 * 10000 / 50);
    assert_eq!(params.n_special(), params.n_seeds() / 1000);
    assert!(params.master_seed.is_none());

    MapParameters::validated(10000, 500, 500, 10, 100, 100, 64).unwrap();
    MapParameters::validated(1920, 1080, 100, 120, 50, 5, 8).unwrap();
}

#[test]
fn rejects_out_of_range_values() {

    for (args, bad) in [
        ((499, 1080, 100, 120, 50, 5, 8), "width"),
        ((1920, 10001, 100, 120, 50, 5, 8), "height"),
        ((1920, 1080, 49, 120, 50, 5, 8), "map_resolution"),
        ((1920, 1080, 100, 9, 50, 5, 8), "island_abundance"),
        ((1920, 1080, 100, 120, 101, 5, 8), "island_size"),
        ((1920, 1080, 100, 120, 50, 101, 8), "coastline_smoothing"),
        ((1920, 1080, 100, 120, 50, 5, 0), "processes"),
    ] {
        let (w, h, r, a, s, c, p) = args;
        match MapParameters::validated(w, h, r, a, s, c, p) {
            Err(MapError::InvalidParameter { name, .. }) => assert_eq!(name, bad),
            other => panic!("expected an InvalidParameter error for {}, got {:?}",
                            bad, other.map(|_| ())),
        }
    }
}

#[test]
fn derived_quantities() {

    let params = MapParameters::validated(1000, 1000, 100, 120, 50, 5, 4).unwrap();
    assert_eq!(params.n_seeds(), 10000);
    assert_eq!(params.n_special(), 83);
    assert_eq!(params.n_pixels(), 1_000_000);
    assert!((params.island_size() - 5.0).abs() < 1e-12);
}
