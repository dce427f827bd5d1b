//! Hardcoded DH parameters for a few robots

pub mod ur_kinematics {
    use crate::parameters::ur_kinematics::Parameters;
    use std::f64::consts::PI;

    /// Link twists shared by the whole UR family.
    const UR_ALPHA: [f64; 6] = [PI / 2.0, 0.0, 0.0, PI / 2.0, -PI / 2.0, 0.0];

    /// Joint names in the order of the joint values.
    pub const UR_JOINT_NAMES: [&str; 6] = [
        "shoulder_pan_joint",
        "shoulder_lift_joint",
        "elbow_joint",
        "wrist_1_joint",
        "wrist_2_joint",
        "wrist_3_joint",
    ];

    impl Parameters {
        // Provides default values
        pub fn new() -> Self {
            Parameters {
                d: [0.0; 6],
                a: [0.0; 6],
                alpha: UR_ALPHA,
                offsets: [0.0; 6],
            }
        }

        pub fn ur3() -> Self {
            Parameters {
                d: [0.1519, 0.0, 0.0, 0.11235, 0.08535, 0.0819],
                a: [0.0, -0.24365, -0.21325, 0.0, 0.0, 0.0],
                ..Self::new()
            }
        }

        pub fn ur5() -> Self {
            Parameters {
                d: [0.089159, 0.0, 0.0, 0.10915, 0.09465, 0.0823],
                a: [0.0, -0.42500, -0.39225, 0.0, 0.0, 0.0],
                ..Self::new()
            }
        }

        pub fn ur10() -> Self {
            Parameters {
                d: [0.1273, 0.0, 0.0, 0.163941, 0.1157, 0.0922],
                a: [0.0, -0.612, -0.5723, 0.0, 0.0, 0.0],
                ..Self::new()
            }
        }

        /// Looks up parameters by robot name as used in configuration files ("ur5", "UR10", ...).
        pub fn by_name(name: &str) -> Option<Self> {
            match name.to_ascii_lowercase().as_str() {
                "ur3" => Some(Self::ur3()),
                "ur5" => Some(Self::ur5()),
                "ur10" => Some(Self::ur10()),
                _ => None,
            }
        }
    }

    impl Default for Parameters {
        fn default() -> Self {
            Self::ur5()
        }
    }
}
