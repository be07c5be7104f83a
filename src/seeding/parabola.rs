//! Closed-form parabola through three hits.

use nalgebra::{Matrix3, Vector3};

use crate::constants::PARABOLA_DET_EPS;
use crate::hits::hit::Hit;

/// Solve `x(dz) = a dz^2 + b dz + c` through three hits, `dz = z - z_ref`.
///
/// Cramer's rule on the 3x3 Vandermonde-like system. A degenerate system
/// (e.g. two hits at the same depth) yields the zero polynomial rather
/// than an error; the caller's matching windows then reject everything.
pub(crate) fn solve_parabola(h1: &Hit, h2: &Hit, h3: &Hit, z_ref: f64) -> (f64, f64, f64) {
    let z1 = h1.z() - z_ref;
    let z2 = h2.z() - z_ref;
    let z3 = h3.z() - z_ref;

    let vander = Matrix3::new(
        z1 * z1, z1, 1.0, //
        z2 * z2, z2, 1.0, //
        z3 * z3, z3, 1.0,
    );
    let det = vander.determinant();
    if det.abs() < PARABOLA_DET_EPS {
        return (0.0, 0.0, 0.0);
    }

    let xs = Vector3::new(h1.x(), h2.x(), h3.x());
    let mut m_a = vander;
    m_a.set_column(0, &xs);
    let mut m_b = vander;
    m_b.set_column(1, &xs);
    let mut m_c = vander;
    m_c.set_column(2, &xs);

    (
        m_a.determinant() / det,
        m_b.determinant() / det,
        m_c.determinant() / det,
    )
}

#[cfg(test)]
mod parabola_test {
    use super::*;
    use crate::hits::hit::ChannelId;
    use approx::assert_relative_eq;

    fn hit_at(id: u32, x: f64, z: f64) -> Hit {
        Hit::new(ChannelId(id), x, z, 1.0, 0.0, 0)
    }

    #[test]
    fn reproduces_the_three_inputs_exactly() {
        let z_ref = 8520.0;
        let (a, b, c) = (3.2e-5, -0.12, 45.0);
        let eval = |z: f64| {
            let dz = z - z_ref;
            a * dz * dz + b * dz + c
        };
        let h1 = hit_at(1, eval(7826.0), 7826.0);
        let h2 = hit_at(2, eval(8578.0), 8578.0);
        let h3 = hit_at(3, eval(9403.0), 9403.0);

        let (sa, sb, sc) = solve_parabola(&h1, &h2, &h3, z_ref);
        assert_relative_eq!(sa, a, epsilon = 1e-12);
        assert_relative_eq!(sb, b, epsilon = 1e-9);
        assert_relative_eq!(sc, c, epsilon = 1e-6);

        for z in [7826.0, 8578.0, 9403.0] {
            let dz = z - z_ref;
            assert_relative_eq!(sa * dz * dz + sb * dz + sc, eval(z), epsilon = 1e-6);
        }
    }

    #[test]
    fn coincident_depths_yield_the_zero_model() {
        let h1 = hit_at(1, 10.0, 8000.0);
        let h2 = hit_at(2, 11.0, 8000.0);
        let h3 = hit_at(3, 12.0, 9000.0);
        assert_eq!(solve_parabola(&h1, &h2, &h3, 8520.0), (0.0, 0.0, 0.0));
    }
}
