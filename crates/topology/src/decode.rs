//! Arc decoding: delta-encoded quantized arcs to absolute coordinates.

use crate::error::{TopologyError, TopologyResult};
use crate::model::{Topology, Transform};

/// Decode every arc into absolute `[x, y]` coordinates.
///
/// With a quantization transform, each arc is a running sum of deltas that
/// restarts at zero per arc, then scaled and translated. Without one, arc
/// positions are already absolute.
pub fn decode_arcs(topology: &Topology) -> TopologyResult<Vec<Vec<[f64; 2]>>> {
    topology
        .arcs()
        .iter()
        .enumerate()
        .map(|(arc_idx, arc)| {
            let mut x0 = 0.0;
            let mut y0 = 0.0;
            arc.iter()
                .enumerate()
                .map(|(point, position)| {
                    let (&qx, &qy) = match (position.first(), position.get(1)) {
                        (Some(x), Some(y)) => (x, y),
                        _ => {
                            return Err(TopologyError::MalformedPosition {
                                arc: arc_idx,
                                point,
                            })
                        }
                    };
                    Ok(match &topology.transform {
                        Some(transform) => {
                            x0 += qx;
                            y0 += qy;
                            transform.apply(x0, y0)
                        }
                        None => [qx, qy],
                    })
                })
                .collect::<TopologyResult<Vec<[f64; 2]>>>()
        })
        .collect()
}

/// Decode a point geometry's position. Points are quantized but never
/// delta-encoded.
pub fn decode_position(transform: Option<&Transform>, coordinates: &[f64]) -> Option<[f64; 2]> {
    let (&x, &y) = (coordinates.first()?, coordinates.get(1)?);
    Some(match transform {
        Some(transform) => transform.apply(x, y),
        None => [x, y],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_quantized_arc() {
        let json = r#"{"type":"Topology","transform":{"scale":[2,0.5],"translate":[100,10]},
            "arcs":[[[0,0],[3,4],[-1,2]],[[5,5]]],"objects":{}}"#;
        let topology = Topology::from_json(json).unwrap();
        let arcs = decode_arcs(&topology).unwrap();

        assert_eq!(arcs[0], vec![[100.0, 10.0], [106.0, 12.0], [104.0, 13.0]]);
        // the running sum restarts for each arc
        assert_eq!(arcs[1], vec![[110.0, 12.5]]);
    }

    #[test]
    fn test_decode_absolute_arc() {
        let json = r#"{"type":"Topology","arcs":[[[1,2],[3,4]]],"objects":{}}"#;
        let topology = Topology::from_json(json).unwrap();
        assert_eq!(
            decode_arcs(&topology).unwrap()[0],
            vec![[1.0, 2.0], [3.0, 4.0]]
        );
    }

    #[test]
    fn test_decode_position() {
        let transform = Transform {
            scale: [10.0, 10.0],
            translate: [1.0, 2.0],
        };
        assert_eq!(
            decode_position(Some(&transform), &[3.0, 4.0]),
            Some([31.0, 42.0])
        );
        assert_eq!(decode_position(None, &[3.0]), None);
    }
}
