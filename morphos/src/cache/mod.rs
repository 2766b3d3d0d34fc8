//! Per-object memoized derived quantities.
//!
//! An [`ObjectCache`] belongs to exactly one object. Every quantity is computed
//! on first request, together with whatever it depends on, and then served from
//! the cache. Moving to another object means building a new cache; nothing can
//! leak from one object to the next.

use std::cell::Cell;

use nalgebra::DMatrix;
use ndarray::{Array2, ArrayD, ArrayViewD, Axis, CowArray, IxDyn, Zip};
use once_cell::unsync::OnceCell;
use strum::EnumCount;
use tracing::trace;

use crate::error::{ObjectError, ObjectResult};
use crate::ndimage::{
    convex_hull_image, find_outer_boundaries, img_as_ubyte, inertia_tensor,
    inertia_tensor_eigvals, moments, moments_central, NdimageError,
};
use crate::object_slice::ObjectSlice;
use crate::quantity::Quantity;
use crate::scene::Scene;

/// Highest moment order kept for spatial and central moments.
pub const MOMENT_ORDER: usize = 3;

/// Spatial moments of objects with fewer axes are embedded into a tensor of
/// this rank.
pub const MOMENT_RANK: usize = 3;

#[derive(Debug)]
pub struct ObjectCache<'a> {
    scene: Scene<'a>,
    object: ObjectSlice,
    object_index: usize,

    crop: OnceCell<ArrayD<f32>>,
    mask: OnceCell<ArrayD<bool>>,
    masked: OnceCell<ArrayD<f32>>,
    coordinates: OnceCell<Array2<usize>>,
    centroid: OnceCell<Vec<f64>>,
    area: OnceCell<u64>,
    euler_number: OnceCell<i64>,
    spatial_moments: OnceCell<ArrayD<f64>>,
    local_centroid: OnceCell<Vec<f64>>,
    central_moments: OnceCell<ArrayD<f64>>,
    inertia_tensor: OnceCell<DMatrix<f64>>,
    inertia_tensor_eigenvalues: OnceCell<Vec<f64>>,
    convex_hull: OnceCell<ArrayD<bool>>,
    edge: OnceCell<ArrayD<f32>>,
    maximum_intensity: OnceCell<f32>,

    computations: [Cell<u32>; Quantity::COUNT],
}

impl<'a> ObjectCache<'a> {
    pub(crate) fn new(scene: Scene<'a>, object: ObjectSlice, object_index: usize) -> Self {
        Self {
            scene,
            object,
            object_index,
            crop: OnceCell::new(),
            mask: OnceCell::new(),
            masked: OnceCell::new(),
            coordinates: OnceCell::new(),
            centroid: OnceCell::new(),
            area: OnceCell::new(),
            euler_number: OnceCell::new(),
            spatial_moments: OnceCell::new(),
            local_centroid: OnceCell::new(),
            central_moments: OnceCell::new(),
            inertia_tensor: OnceCell::new(),
            inertia_tensor_eigenvalues: OnceCell::new(),
            convex_hull: OnceCell::new(),
            edge: OnceCell::new(),
            maximum_intensity: OnceCell::new(),
            computations: Default::default(),
        }
    }

    #[inline]
    pub fn object(&self) -> &ObjectSlice {
        &self.object
    }

    #[inline]
    pub fn label(&self) -> u32 {
        self.object.label()
    }

    /// 1-based position of the object among all located objects.
    #[inline]
    pub fn object_index(&self) -> usize {
        self.object_index
    }

    /// How many times `quantity` has been computed for this object (0 or 1).
    #[inline]
    pub fn computation_count(&self, quantity: Quantity) -> u32 {
        self.computations[quantity.index()].get()
    }

    pub fn is_computed(&self, quantity: Quantity) -> bool {
        self.computation_count(quantity) > 0
    }

    pub(crate) fn scene(&self) -> &Scene<'a> {
        &self.scene
    }

    fn memoize<'s, T>(
        &'s self,
        cell: &'s OnceCell<T>,
        quantity: Quantity,
        compute: impl FnOnce() -> ObjectResult<T>,
    ) -> ObjectResult<&'s T> {
        cell.get_or_try_init(|| {
            let counter = &self.computations[quantity.index()];
            counter.set(counter.get() + 1);
            trace!(label = self.label(), %quantity, "computing derived quantity");
            compute()
        })
    }

    fn dependency_error(&self, quantity: Quantity) -> impl Fn(NdimageError) -> ObjectError {
        let label = self.label();
        move |source| ObjectError::Dependency {
            label,
            quantity,
            source,
        }
    }

    fn degenerate(&self, quantity: Quantity) -> ObjectError {
        ObjectError::Degenerate {
            label: self.label(),
            quantity,
        }
    }

    // ------------------------------------------------------------------------
    // Quantities
    // ------------------------------------------------------------------------

    /// Intensity image restricted to the object's bounding box, channels included.
    pub fn crop(&self) -> ObjectResult<&ArrayD<f32>> {
        self.memoize(&self.crop, Quantity::Crop, || {
            let crop = self
                .scene
                .intensity()
                .pixels()
                .slice_each_axis(|axis| self.object.axis_slice(axis.axis.index()));
            Ok(crop.to_owned())
        })
    }

    /// Label image inside the bounding box, thresholded at `> 0`, with every
    /// length-1 axis removed.
    pub fn mask(&self) -> ObjectResult<&ArrayD<bool>> {
        self.memoize(&self.mask, Quantity::Mask, || {
            let mut mask = self
                .scene
                .label()
                .labels()
                .slice_each_axis(|axis| self.object.axis_slice(axis.axis.index()))
                .mapv(|label| label > 0);
            for axis in (0..mask.ndim()).rev() {
                if mask.len_of(Axis(axis)) == 1 {
                    mask = mask.index_axis_move(Axis(axis), 0);
                }
            }
            Ok(mask)
        })
    }

    /// Mask laid out over the full spatial shape of the bounding box.
    fn spatial_mask(&self) -> ObjectResult<CowArray<'_, bool, IxDyn>> {
        let mask = self.mask()?;
        mask.to_shape(IxDyn(&self.object.shape()))
            .map_err(|e| self.dependency_error(Quantity::Mask)(NdimageError::Shape(e.to_string())))
    }

    /// `crop * mask`, the mask broadcast over channels.
    pub fn masked(&self) -> ObjectResult<&ArrayD<f32>> {
        self.memoize(&self.masked, Quantity::Masked, || {
            let crop = self.crop()?;
            let mask = self.spatial_mask()?;
            Ok(self.apply_spatial_mask(crop, mask.view()))
        })
    }

    fn apply_spatial_mask(&self, crop: &ArrayD<f32>, mask: ArrayViewD<'_, bool>) -> ArrayD<f32> {
        let mut result = crop.clone();
        if self.scene.multichannel() {
            let channel_axis = Axis(self.object.ndim());
            let lanes = result.lanes_mut(channel_axis).into_iter();
            for (mut lane, &keep) in lanes.zip(mask.iter()) {
                if !keep {
                    lane.fill(0.0);
                }
            }
        } else {
            Zip::from(&mut result).and(&mask).for_each(|value, &keep| {
                if !keep {
                    *value = 0.0;
                }
            });
        }
        result
    }

    /// Absolute positions of the non-zero crop pixels, one row per pixel.
    ///
    /// For multichannel images a position counts once when any channel is
    /// non-zero.
    pub fn coordinates(&self) -> ObjectResult<&Array2<usize>> {
        self.memoize(&self.coordinates, Quantity::Coordinates, || {
            let crop = self.crop()?;
            let ndim = self.object.ndim();
            let occupied = if self.scene.multichannel() {
                crop.map_axis(Axis(ndim), |lane| lane.iter().any(|&v| v != 0.0))
            } else {
                crop.mapv(|v| v != 0.0)
            };

            let mut flat = Vec::new();
            for (index, _) in occupied.indexed_iter().filter(|&(_, &inside)| inside) {
                flat.extend((0..ndim).map(|axis| index[axis] + self.object.start(axis)));
            }

            Array2::from_shape_vec((flat.len() / ndim.max(1), ndim), flat)
                .map_err(|e| {
                    self.dependency_error(Quantity::Coordinates)(NdimageError::Shape(e.to_string()))
                })
        })
    }

    /// Mean of [`coordinates`](Self::coordinates) per axis.
    pub fn centroid(&self) -> ObjectResult<&Vec<f64>> {
        self.memoize(&self.centroid, Quantity::Centroid, || {
            let coordinates = self.coordinates()?;
            if coordinates.nrows() == 0 {
                return Err(self.degenerate(Quantity::Centroid));
            }
            let count = coordinates.nrows() as f64;
            Ok(coordinates
                .columns()
                .into_iter()
                .map(|column| column.iter().map(|&c| c as f64).sum::<f64>() / count)
                .collect())
        })
    }

    /// Sum of every label value in the whole label image.
    pub fn area(&self) -> ObjectResult<u64> {
        self.memoize(&self.area, Quantity::Area, || {
            Ok(self.scene.label().labels().iter().map(|&v| v as u64).sum())
        })
        .copied()
    }

    /// Euler number of the whole label image, computed once per scene.
    pub fn euler_number(&self) -> ObjectResult<i64> {
        self.memoize(&self.euler_number, Quantity::EulerNumber, || {
            self.scene
                .euler_number()
                .map_err(self.dependency_error(Quantity::EulerNumber))
        })
        .copied()
    }

    /// Raw moments up to order 3 of [`masked`](Self::masked) as 8-bit.
    ///
    /// Objects with fewer than three axes are embedded into a zero `4×4×4`
    /// tensor at leading zero indices, so `spatial_moments[0]` of a 2-D object
    /// is its moment matrix. Multichannel objects use the channel mean.
    pub fn spatial_moments(&self) -> ObjectResult<&ArrayD<f64>> {
        self.memoize(&self.spatial_moments, Quantity::SpatialMoments, || {
            let to_error = self.dependency_error(Quantity::SpatialMoments);
            let masked = self.masked()?;
            let ndim = self.object.ndim();

            let single: CowArray<'_, f32, IxDyn> = if self.scene.multichannel() {
                masked
                    .mean_axis(Axis(ndim))
                    .ok_or_else(|| to_error(NdimageError::Shape("image has no channels".into())))?
                    .into()
            } else {
                masked.view().into()
            };

            let ubyte = img_as_ubyte(single.view()).map_err(&to_error)?;
            let raw = moments(ubyte.view(), MOMENT_ORDER);
            if ndim >= MOMENT_RANK {
                return Ok(raw);
            }

            let mut embedded = ArrayD::<f64>::zeros(IxDyn(&[MOMENT_ORDER + 1; MOMENT_RANK]));
            let mut target = embedded.view_mut();
            for _ in ndim..MOMENT_RANK {
                target = target.index_axis_move(Axis(0), 0);
            }
            target.assign(&raw);
            Ok(embedded)
        })
    }

    fn spatial_tensor_index(&self, object_index: &[usize]) -> Vec<usize> {
        let ndim = self.object.ndim();
        let rank = ndim.max(MOMENT_RANK);
        let mut index = vec![0; rank];
        index[rank - ndim..].copy_from_slice(object_index);
        index
    }

    /// Spatial moment `[a, b, c]` of the embedded tensor.
    ///
    /// Tensors of rank above three are read with trailing zero indices.
    pub fn spatial_moment(&self, order: [usize; 3]) -> ObjectResult<f64> {
        let tensor = self.spatial_moments()?;
        let mut index = vec![0; tensor.ndim()];
        index[..MOMENT_RANK].copy_from_slice(&order);
        Ok(tensor[IxDyn(&index)])
    }

    /// First-order spatial moments over the zeroth, in crop coordinates.
    pub fn local_centroid(&self) -> ObjectResult<&Vec<f64>> {
        self.memoize(&self.local_centroid, Quantity::LocalCentroid, || {
            let tensor = self.spatial_moments()?;
            let ndim = self.object.ndim();

            let mut unit = vec![0; ndim];
            let m0 = tensor[IxDyn(&self.spatial_tensor_index(&unit))];
            if m0 == 0.0 {
                return Err(self.degenerate(Quantity::LocalCentroid));
            }

            Ok((0..ndim)
                .map(|axis| {
                    unit.fill(0);
                    unit[axis] = 1;
                    tensor[IxDyn(&self.spatial_tensor_index(&unit))] / m0
                })
                .collect())
        })
    }

    /// Central moments up to order 3 of the object mask about
    /// [`local_centroid`](Self::local_centroid).
    pub fn central_moments(&self) -> ObjectResult<&ArrayD<f64>> {
        self.memoize(&self.central_moments, Quantity::CentralMoments, || {
            let center = self.local_centroid()?;
            let mask = self.spatial_mask()?.mapv(u8::from);
            moments_central(mask.view(), center, MOMENT_ORDER)
                .map_err(self.dependency_error(Quantity::CentralMoments))
        })
    }

    pub fn inertia_tensor(&self) -> ObjectResult<&DMatrix<f64>> {
        self.memoize(&self.inertia_tensor, Quantity::InertiaTensor, || {
            let mu = self.central_moments()?;
            if mu.iter().next().is_some_and(|&mu0| mu0 == 0.0) {
                return Err(self.degenerate(Quantity::InertiaTensor));
            }
            inertia_tensor(mu).map_err(self.dependency_error(Quantity::InertiaTensor))
        })
    }

    /// Eigenvalues of [`inertia_tensor`](Self::inertia_tensor), largest first.
    pub fn inertia_tensor_eigenvalues(&self) -> ObjectResult<&Vec<f64>> {
        self.memoize(
            &self.inertia_tensor_eigenvalues,
            Quantity::InertiaTensorEigenvalues,
            || {
                let tensor = self.inertia_tensor()?;
                inertia_tensor_eigvals(tensor)
                    .map_err(self.dependency_error(Quantity::InertiaTensorEigenvalues))
            },
        )
    }

    pub fn convex_hull(&self) -> ObjectResult<&ArrayD<bool>> {
        self.memoize(&self.convex_hull, Quantity::ConvexHull, || {
            let mask = self.mask()?;
            convex_hull_image(mask.view()).map_err(self.dependency_error(Quantity::ConvexHull))
        })
    }

    /// Crop intensities on the background pixels bordering the object, zero
    /// elsewhere.
    pub fn edge(&self) -> ObjectResult<&ArrayD<f32>> {
        self.memoize(&self.edge, Quantity::Edge, || {
            let crop = self.crop()?;
            let boundary = find_outer_boundaries(self.spatial_mask()?.view());
            Ok(self.apply_spatial_mask(crop, boundary.view()))
        })
    }

    /// Largest value of [`masked`](Self::masked).
    pub fn maximum_intensity(&self) -> ObjectResult<f32> {
        self.memoize(&self.maximum_intensity, Quantity::MaximumIntensity, || {
            let masked = self.masked()?;
            masked
                .iter()
                .copied()
                .reduce(f32::max)
                .ok_or_else(|| self.degenerate(Quantity::MaximumIntensity))
        })
        .copied()
    }

    /// Index along `axis` of the first pixel of the whole intensity image, in
    /// row-major order, equal to [`maximum_intensity`](Self::maximum_intensity).
    pub fn maximum_intensity_position(&self, axis: usize) -> ObjectResult<usize> {
        let maximum = self.maximum_intensity()?;
        let pixels = self.scene.intensity().pixels();
        if axis >= pixels.ndim() {
            return Err(self.dependency_error(Quantity::MaximumIntensity)(
                NdimageError::DimensionMismatch {
                    expected: axis + 1,
                    actual: pixels.ndim(),
                },
            ));
        }
        pixels
            .indexed_iter()
            .find(|&(_, &value)| value == maximum)
            .map(|(index, _)| index[axis])
            .ok_or_else(|| self.degenerate(Quantity::MaximumIntensity))
    }
}
