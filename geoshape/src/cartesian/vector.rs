use approx::{AbsDiffEq, RelativeEq};
use nalgebra::{RealField, Scalar};
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// A vector (or a position) in 2-dimensional cartesian space, backed by [`nalgebra::Vector2`].
///
/// This is the type used for all the planar math of the crate, e.g. for positions in the normalized Web-Mercator
/// plane.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector2<Num: Scalar = f64>(nalgebra::Vector2<Num>);

impl<Num: Scalar + Copy> Vector2<Num> {
    /// Creates a new vector with the given coordinates.
    pub fn new(x: Num, y: Num) -> Self {
        Self(nalgebra::Vector2::new(x, y))
    }

    /// Returns x coordinate of the vector.
    pub fn x(&self) -> Num {
        self.0.x
    }

    /// Returns y coordinate of the vector.
    pub fn y(&self) -> Num {
        self.0.y
    }

    /// Updates x coordinate of the vector.
    pub fn set_x(&mut self, x: Num) {
        self.0.x = x;
    }

    /// Updates y coordinate of the vector.
    pub fn set_y(&mut self, y: Num) {
        self.0.y = y;
    }

    /// Underlying nalgebra vector.
    pub fn as_nalgebra(&self) -> &nalgebra::Vector2<Num> {
        &self.0
    }
}

impl<Num: RealField + Copy> Vector2<Num> {
    /// Creates a 2d vector from a 3d one by dropping the `z` coordinate.
    pub fn from_3d(v: Vector3<Num>) -> Self {
        Self(v.0.xy())
    }

    /// Converts the vector into a 3d one with `z` set to zero.
    pub fn to_3d(self) -> Vector3<Num> {
        Vector3::new(self.x(), self.y(), Num::zero())
    }

    /// Returns true if both coordinates are zero.
    pub fn is_null(&self) -> bool {
        self.0.iter().all(|c| c.is_zero())
    }

    /// Dot product of two vectors.
    pub fn dot(&self, other: &Self) -> Num {
        self.0.dot(&other.0)
    }

    /// Returns squared magnitude (squared length) of the vector.
    pub fn length_sq(&self) -> Num {
        self.0.norm_squared()
    }

    /// Returns magnitude (length) of the vector.
    pub fn length(&self) -> Num {
        self.0.norm()
    }

    /// Returns the vector of the unit length with the same direction.
    ///
    /// A zero vector stays zero.
    pub fn normalized(&self) -> Self {
        Self(
            self.0
                .try_normalize(Num::zero())
                .unwrap_or_else(nalgebra::Vector2::zeros),
        )
    }

    /// Normalizes the vector in place. See [`Vector2::normalized`].
    pub fn normalize(&mut self) {
        *self = self.normalized();
    }

    /// Distance from this point to the line going through `point` in the given `direction`.
    ///
    /// `direction` is expected to be normalized. If it is a zero vector, the distance to `point` is returned.
    pub fn distance_to_line(&self, point: Self, direction: Self) -> Num {
        if direction.is_null() {
            return (*self - point).length();
        }

        let projected = point + direction * (*self - point).dot(&direction);
        (*self - projected).length()
    }
}

impl<Num: Scalar + Zero> Default for Vector2<Num> {
    fn default() -> Self {
        Self(nalgebra::Vector2::zeros())
    }
}

/// A vector (or a position) in 3-dimensional cartesian space, backed by [`nalgebra::Vector3`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector3<Num: Scalar = f64>(nalgebra::Vector3<Num>);

impl<Num: Scalar + Copy> Vector3<Num> {
    /// Creates a new vector with the given coordinates.
    pub fn new(x: Num, y: Num, z: Num) -> Self {
        Self(nalgebra::Vector3::new(x, y, z))
    }

    /// Returns x coordinate of the vector.
    pub fn x(&self) -> Num {
        self.0.x
    }

    /// Returns y coordinate of the vector.
    pub fn y(&self) -> Num {
        self.0.y
    }

    /// Returns z coordinate of the vector.
    pub fn z(&self) -> Num {
        self.0.z
    }

    /// Updates x coordinate of the vector.
    pub fn set_x(&mut self, x: Num) {
        self.0.x = x;
    }

    /// Updates y coordinate of the vector.
    pub fn set_y(&mut self, y: Num) {
        self.0.y = y;
    }

    /// Updates z coordinate of the vector.
    pub fn set_z(&mut self, z: Num) {
        self.0.z = z;
    }

    /// Underlying nalgebra vector.
    pub fn as_nalgebra(&self) -> &nalgebra::Vector3<Num> {
        &self.0
    }
}

impl<Num: RealField + Copy> Vector3<Num> {
    /// Creates a 3d vector from a 2d one with `z` set to zero.
    pub fn from_2d(v: Vector2<Num>) -> Self {
        v.to_3d()
    }

    /// Returns true if all coordinates are zero.
    pub fn is_null(&self) -> bool {
        self.0.iter().all(|c| c.is_zero())
    }

    /// Dot product of two vectors.
    pub fn dot(&self, other: &Self) -> Num {
        self.0.dot(&other.0)
    }

    /// Cross product of two vectors.
    pub fn cross(&self, other: &Self) -> Self {
        Self(self.0.cross(&other.0))
    }

    /// Unit vector orthogonal to both `v1` and `v2`.
    pub fn normal(v1: &Self, v2: &Self) -> Self {
        v1.cross(v2).normalized()
    }

    /// Returns squared magnitude (squared length) of the vector.
    pub fn length_sq(&self) -> Num {
        self.0.norm_squared()
    }

    /// Returns magnitude (length) of the vector.
    pub fn length(&self) -> Num {
        self.0.norm()
    }

    /// Returns the vector of the unit length with the same direction.
    ///
    /// A zero vector stays zero.
    pub fn normalized(&self) -> Self {
        Self(
            self.0
                .try_normalize(Num::zero())
                .unwrap_or_else(nalgebra::Vector3::zeros),
        )
    }

    /// Normalizes the vector in place. See [`Vector3::normalized`].
    pub fn normalize(&mut self) {
        *self = self.normalized();
    }

    /// Distance from this point to the line going through `point` in the given `direction`.
    ///
    /// `direction` is expected to be normalized. If it is a zero vector, the distance to `point` is returned.
    pub fn distance_to_line(&self, point: Self, direction: Self) -> Num {
        if direction.is_null() {
            return (*self - point).length();
        }

        let projected = point + direction * (*self - point).dot(&direction);
        (*self - projected).length()
    }

    /// Signed distance from this point to the plane going through `plane` with the given `normal`. Positive on the
    /// side the normal points to.
    ///
    /// `normal` is expected to be normalized.
    pub fn distance_to_plane(&self, plane: Self, normal: Self) -> Num {
        (*self - plane).dot(&normal)
    }

    /// Signed distance from this point to the plane going through three points. The normal of the plane is
    /// `(p2 - p1) x (p3 - p1)`.
    pub fn distance_to_plane3(&self, p1: Self, p2: Self, p3: Self) -> Num {
        let normal = Self::normal(&(p2 - p1), &(p3 - p1));
        self.distance_to_plane(p1, normal)
    }
}

impl<Num: Scalar + Zero> Default for Vector3<Num> {
    fn default() -> Self {
        Self(nalgebra::Vector3::zeros())
    }
}

macro_rules! impl_vector_ops {
    ($vector:ident) => {
        impl<Num: RealField + Copy> std::ops::Add for $vector<Num> {
            type Output = Self;

            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl<Num: RealField + Copy> std::ops::AddAssign for $vector<Num> {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl<Num: RealField + Copy> std::ops::Sub for $vector<Num> {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl<Num: RealField + Copy> std::ops::SubAssign for $vector<Num> {
            fn sub_assign(&mut self, rhs: Self) {
                self.0 -= rhs.0;
            }
        }

        impl<Num: RealField + Copy> std::ops::Mul<Num> for $vector<Num> {
            type Output = Self;

            fn mul(self, rhs: Num) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        /// Component-wise multiplication.
        impl<Num: RealField + Copy> std::ops::Mul for $vector<Num> {
            type Output = Self;

            fn mul(self, rhs: Self) -> Self::Output {
                Self(self.0.component_mul(&rhs.0))
            }
        }

        impl<Num: RealField + Copy> std::ops::Div<Num> for $vector<Num> {
            type Output = Self;

            fn div(self, rhs: Num) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl<Num: RealField + Copy> std::ops::Neg for $vector<Num> {
            type Output = Self;

            fn neg(self) -> Self::Output {
                Self(-self.0)
            }
        }

        impl<Num: Scalar> From<nalgebra::$vector<Num>> for $vector<Num> {
            fn from(value: nalgebra::$vector<Num>) -> Self {
                Self(value)
            }
        }

        impl<Num: Scalar> From<$vector<Num>> for nalgebra::$vector<Num> {
            fn from(value: $vector<Num>) -> Self {
                value.0
            }
        }

        impl<Num> AbsDiffEq for $vector<Num>
        where
            Num: Scalar + AbsDiffEq<Epsilon = Num>,
        {
            type Epsilon = Num;

            fn default_epsilon() -> Self::Epsilon {
                Num::default_epsilon()
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
                self.0.abs_diff_eq(&other.0, epsilon)
            }
        }

        impl<Num> RelativeEq for $vector<Num>
        where
            Num: Scalar + RelativeEq<Epsilon = Num>,
        {
            fn default_max_relative() -> Self::Epsilon {
                Num::default_max_relative()
            }

            fn relative_eq(
                &self,
                other: &Self,
                epsilon: Self::Epsilon,
                max_relative: Self::Epsilon,
            ) -> bool {
                self.0.relative_eq(&other.0, epsilon, max_relative)
            }
        }
    };
}

impl_vector_ops!(Vector2);
impl_vector_ops!(Vector3);

impl<Num: RealField + Copy> From<Vector3<Num>> for Vector2<Num> {
    fn from(value: Vector3<Num>) -> Self {
        Self::from_3d(value)
    }
}

impl<Num: RealField + Copy> From<Vector2<Num>> for Vector3<Num> {
    fn from(value: Vector2<Num>) -> Self {
        value.to_3d()
    }
}
