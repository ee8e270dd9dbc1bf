//! One frame of the show run through the CPU passes in GPU order.

use choreography::bitonic::apply_pass;
use choreography::flight::FlightPlan;
use choreography::formation::{FormationKind, FormationSlot, generate};
use choreography::hash::{HashKey, hash_keys, max_cell_occupancy, ranks};
use choreography::show::Show;
use choreography::texture::{PositionTexture, index_to_texel, texel_to_index};
use choreography::{PingPong, PipelineConfig, Timeline};
use constants::procedural_shader::HASH_CELL_SIZE;
use pretty_assertions::assert_eq;

const DRONES: usize = 1000;

fn default_show(config: &PipelineConfig) -> Show {
    let kinds = [
        FormationKind::default_grid(),
        FormationKind::default_sphere(),
        FormationKind::default_heart(),
    ];
    let formations = kinds
        .iter()
        .map(|k| generate(k, config.drone_count()).unwrap())
        .collect();
    Show::new(
        formations,
        Timeline::new(kinds.len()),
        FlightPlan::new(config.texture_width()),
    )
    .unwrap()
}

#[test]
fn position_hash_sort_rank() {
    let config = PipelineConfig::new(DRONES).unwrap();
    let show = default_show(&config);
    let time = 22.0;

    // position pass
    let slots: Vec<FormationSlot> = (0..DRONES)
        .map(|id| {
            let state = show.state_at(id, time);
            FormationSlot {
                position: state.position,
                colour: state.colour,
            }
        })
        .collect();
    let texture = PositionTexture::encode(&slots, 0);
    assert_eq!(texture.width(), config.texture_width());

    // hash pass reads back through texel coordinates
    let decoded: Vec<FormationSlot> = (0..DRONES)
        .map(|i| {
            let (x, y) = index_to_texel(i, texture.width()).unwrap();
            assert_eq!(texel_to_index(x, y, texture.width()), i);
            FormationSlot {
                position: texture.decode(i).unwrap(),
                colour: slots[i].colour,
            }
        })
        .collect();
    let keys = hash_keys(&decoded, HASH_CELL_SIZE, config.sort_len());

    // sort passes
    let mut sort = PingPong::new(keys.clone(), keys.clone());
    for pass in config.sort_passes() {
        let (input, output) = sort.split();
        apply_pass(input, output, *pass);
        sort.swap();
    }
    let sorted = sort.read().clone();
    let mut expected = keys;
    expected.sort();
    assert_eq!(sorted, expected);
    assert!(sorted[DRONES..].iter().all(HashKey::is_empty));

    // rank pass
    let rank = ranks(&sorted);
    for (position, key) in sorted.iter().enumerate() {
        assert_eq!(rank[key.id as usize] as usize, position);
    }
    assert!(max_cell_occupancy(&sorted) >= 1);
}

#[test]
fn same_frame_twice_is_identical() {
    let config = PipelineConfig::new(256).unwrap();
    let show = default_show(&config);
    let first: Vec<_> = (0..256).map(|id| show.position_at(id, 31.0)).collect();
    let second: Vec<_> = (0..256).map(|id| show.position_at(id, 31.0)).collect();
    assert_eq!(first, second);
    assert!(first.iter().all(|p| p.is_finite()));
}
