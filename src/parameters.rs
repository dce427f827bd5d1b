//! Defines the Denavit-Hartenberg parameter data structure

pub mod ur_kinematics {
    use crate::utils::deg;

    /// Parameters for the robot. See [parameters_robots.rs](parameters_robots.rs) for examples of concrete robot models.
    #[derive(Debug, Clone, Copy, PartialEq)]
    /// Standard DH parameters of a six axis arm with Universal Robots geometry.
    pub struct Parameters {
        /// Link offsets along the previous z axis, meters.
        pub d: [f64; 6],

        /// Link lengths along the common normal, meters. On UR arms
        /// only the upper arm and forearm (a[1], a[2]) are non zero.
        pub a: [f64; 6],

        /// Link twists about the common normal, radians.
        pub alpha: [f64; 6],

        /// Offsets applied to each joint angle to adjust the reference zero position.
        pub offsets: [f64; 6],
    }

    impl Parameters {
        /// Convert to string yaml representation (quick viewing, etc).
        pub fn to_yaml(&self) -> String {
            fn join(values: &[f64; 6]) -> String {
                values.iter().map(|x| x.to_string()).collect::<Vec<_>>().join(", ")
            }
            format!(
                "dh_parameters:\n  \
              d: [{}]\n  \
              a: [{}]\n  \
              alpha: [{}]\n\
            joint_offsets: [{}]\n",
                join(&self.d),
                join(&self.a),
                self.alpha.iter().map(|x| deg(x)).collect::<Vec<_>>().join(", "),
                self.offsets.iter().map(|x| deg(x)).collect::<Vec<_>>().join(", "),
            )
        }
    }
}
