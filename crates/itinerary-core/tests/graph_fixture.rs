use itinerary_core::{
    EdgeSource, Gazetteer, GraphBuilder, GraphConfig, ItineraryStatus, Solution, SolveInput, TourReconstructor,
    Tour, TransportMode, TripRules,
};

fn load() -> SolveInput {
    serde_json::from_str(include_str!("fixtures/southeast_trip.json")).unwrap()
}

#[test]
fn retained_edges_are_never_dominated() {
    let mut input = load();
    input.request.apply_hotel_rates(&input.hotels);
    let config = GraphConfig::default();
    let gazetteer = Gazetteer::builtin();
    let matrix = GraphBuilder::new(&config, &gazetteer).build(&input.offers, &input.request, &input.cars);

    for offer in input.offers.iter().filter(|o| o.is_usable()) {
        let i = matrix.index_of(&offer.origin).unwrap();
        let j = matrix.index_of(&offer.destination).unwrap();
        let kept = matrix.edge(i, j).unwrap();
        assert!(kept.score <= matrix.score(offer.price, offer.duration_minutes as f64));
    }

    // 3 pax, weights (1, 0.5): GOL 390*3 + 40 beats LATAM 420*3 + 37.5 and Azul 380*3 + 85
    let sp = matrix.index_of("São Paulo").unwrap();
    let bh = matrix.index_of("Belo Horizonte").unwrap();
    assert_eq!(matrix.cost(sp, bh), 390.0);

    // the negative-priced offer is skipped, but Rio and BH are close enough to drive
    let rio = matrix.index_of("Rio de Janeiro").unwrap();
    assert!(matches!(matrix.edge(rio, bh).unwrap().source, EdgeSource::Ground { .. }));
}

#[test]
fn reconstructs_the_mandatory_route() {
    let mut input = load();
    input.request.apply_hotel_rates(&input.hotels);
    let config = GraphConfig::default();
    let gazetteer = Gazetteer::builtin();
    let matrix = GraphBuilder::new(&config, &gazetteer).build(&input.offers, &input.request, &input.cars);
    let rules = TripRules::new(&input.request, &matrix);

    let sp = matrix.index_of("São Paulo").unwrap();
    let bh = matrix.index_of("Belo Horizonte").unwrap();
    let rio = matrix.index_of("Rio de Janeiro").unwrap();

    assert!(Tour::new(vec![sp, rio], &rules, &matrix).is_none());
    let tour = Tour::new(vec![sp, bh, rio], &rules, &matrix).unwrap();

    let reconstructor = TourReconstructor::new(&matrix, &input.offers, &gazetteer);
    let itinerary = reconstructor.itinerary(&Solution::Walk(tour.into_walk()), ItineraryStatus::Optimal);

    assert_eq!(itinerary.cities(), vec!["São Paulo", "Belo Horizonte", "Rio de Janeiro"]);
    let first = &itinerary.legs[0];
    assert_eq!(first.mode, TransportMode::Flight);
    assert_eq!(first.offer.as_ref().unwrap().provider.reference, "G31402");
    assert_eq!(first.alternatives.len(), 2);
    assert!(first.from_coords.is_some());

    // fares 3 * (390 + 310); two nights at 140 and 320; 40 a day for 3 people, 2 days, 2 cities
    let breakdown = itinerary.cost_breakdown.unwrap();
    assert_eq!(breakdown.flight, 2100.0);
    assert_eq!(breakdown.hotel, 920.0);
    assert_eq!(breakdown.daily, 480.0);
    assert!((itinerary.total_cost - breakdown.total()).abs() < 1e-9);
    assert_eq!(itinerary.total_duration, 145);
}
