//! Texture storage and sampling.
//!
//! Texels are linear RGBA floats. Filtering follows the bound
//! [`SamplerState`] (bilinear by default). 2D textures wrap or clamp per its
//! address mode; cube maps always clamp at face edges.

use cgmath::{InnerSpace, Vector2, Vector3, Vector4};

use crate::gfx::device::{AddressMode, SamplerState, TextureFilter};

/// Face order of a cube texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeFace {
    PositiveX = 0,
    NegativeX = 1,
    PositiveY = 2,
    NegativeY = 3,
    PositiveZ = 4,
    NegativeZ = 5,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    /// Picks the face hit by `dir` and the face coordinates in `[0, 1]`.
    pub fn project(dir: Vector3<f32>) -> (CubeFace, Vector2<f32>) {
        let (ax, ay, az) = (dir.x.abs(), dir.y.abs(), dir.z.abs());

        let (face, sc, tc, ma) = if ax >= ay && ax >= az {
            if dir.x >= 0.0 {
                (CubeFace::PositiveX, -dir.z, -dir.y, ax)
            } else {
                (CubeFace::NegativeX, dir.z, -dir.y, ax)
            }
        } else if ay >= az {
            if dir.y >= 0.0 {
                (CubeFace::PositiveY, dir.x, dir.z, ay)
            } else {
                (CubeFace::NegativeY, dir.x, -dir.z, ay)
            }
        } else if dir.z >= 0.0 {
            (CubeFace::PositiveZ, dir.x, -dir.y, az)
        } else {
            (CubeFace::NegativeZ, -dir.x, -dir.y, az)
        };

        if ma <= f32::EPSILON {
            return (CubeFace::PositiveX, Vector2::new(0.5, 0.5));
        }

        let uv = Vector2::new((sc / ma + 1.0) * 0.5, (tc / ma + 1.0) * 0.5);
        (face, uv)
    }

    /// Unit direction through the face coordinate `uv` in `[0, 1]`.
    pub fn direction(self, uv: Vector2<f32>) -> Vector3<f32> {
        let sc = uv.x * 2.0 - 1.0;
        let tc = uv.y * 2.0 - 1.0;
        let dir = match self {
            CubeFace::PositiveX => Vector3::new(1.0, -tc, -sc),
            CubeFace::NegativeX => Vector3::new(-1.0, -tc, sc),
            CubeFace::PositiveY => Vector3::new(sc, 1.0, tc),
            CubeFace::NegativeY => Vector3::new(sc, -1.0, -tc),
            CubeFace::PositiveZ => Vector3::new(sc, -tc, 1.0),
            CubeFace::NegativeZ => Vector3::new(-sc, -tc, -1.0),
        };
        dir.normalize()
    }
}

/// A flat RGBA texture addressed by `uv`.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture2D {
    width: usize,
    height: usize,
    texels: Vec<[f32; 4]>,
}

impl Texture2D {
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> [f32; 4]) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut texels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                texels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            texels,
        }
    }

    pub fn solid(color: [f32; 4]) -> Self {
        Self::from_fn(1, 1, |_, _| color)
    }

    /// Two-color checkerboard with `cells` squares per side.
    pub fn checker(size: usize, cells: usize, a: [f32; 4], b: [f32; 4]) -> Self {
        let cell = (size / cells.max(1)).max(1);
        Self::from_fn(size, size, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                a
            } else {
                b
            }
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn texel(&self, x: usize, y: usize) -> Vector4<f32> {
        self.texels[y * self.width + x].into()
    }

    /// Bilinear sample with wrap addressing.
    pub fn sample(&self, uv: Vector2<f32>) -> Vector4<f32> {
        self.sample_with(uv, SamplerState::default())
    }

    /// Samples with the filter and address mode of `sampler`.
    pub fn sample_with(&self, uv: Vector2<f32>, sampler: SamplerState) -> Vector4<f32> {
        let address = sampler.address;
        let resolve = |v: f32, n: usize| match address {
            AddressMode::Wrap => (v as i64).rem_euclid(n as i64) as usize,
            AddressMode::Clamp => (v as i64).clamp(0, n as i64 - 1) as usize,
        };
        let u = address_coord(uv.x, address) * self.width as f32;
        let v = address_coord(uv.y, address) * self.height as f32;

        match sampler.filter {
            TextureFilter::Nearest => {
                self.texel(resolve(u.floor(), self.width), resolve(v.floor(), self.height))
            }
            TextureFilter::Bilinear => {
                let (fx, fy) = (u - 0.5, v - 0.5);
                let (x0, tx) = (fx.floor(), fx - fx.floor());
                let (y0, ty) = (fy.floor(), fy - fy.floor());
                let (x0i, x1i) = (resolve(x0, self.width), resolve(x0 + 1.0, self.width));
                let (y0i, y1i) = (resolve(y0, self.height), resolve(y0 + 1.0, self.height));

                bilinear(
                    self.texel(x0i, y0i),
                    self.texel(x1i, y0i),
                    self.texel(x0i, y1i),
                    self.texel(x1i, y1i),
                    tx,
                    ty,
                )
            }
        }
    }
}

fn address_coord(c: f32, address: AddressMode) -> f32 {
    match address {
        AddressMode::Wrap => c.rem_euclid(1.0),
        AddressMode::Clamp => c.clamp(0.0, 1.0),
    }
}

/// Six square faces addressed by a direction vector.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeTexture {
    size: usize,
    faces: [Vec<[f32; 4]>; 6],
}

impl CubeTexture {
    pub fn from_fn(size: usize, f: impl Fn(CubeFace, usize, usize) -> [f32; 4]) -> Self {
        let size = size.max(1);
        let faces = CubeFace::ALL.map(|face| {
            let mut texels = Vec::with_capacity(size * size);
            for y in 0..size {
                for x in 0..size {
                    texels.push(f(face, x, y));
                }
            }
            texels
        });
        Self { size, faces }
    }

    /// Builds each texel from the direction through its center.
    pub fn from_direction_fn(size: usize, f: impl Fn(Vector3<f32>) -> [f32; 4]) -> Self {
        let n = size.max(1) as f32;
        Self::from_fn(size, |face, x, y| {
            let uv = Vector2::new((x as f32 + 0.5) / n, (y as f32 + 0.5) / n);
            f(face.direction(uv))
        })
    }

    pub fn solid(color: [f32; 4]) -> Self {
        Self::from_fn(1, |_, _, _| color)
    }

    /// Vertical gradient: ground below the horizon, horizon to zenith above.
    pub fn sky_gradient(size: usize, ground: [f32; 4], horizon: [f32; 4], zenith: [f32; 4]) -> Self {
        Self::from_direction_fn(size, |dir| {
            let (from, to, t) = if dir.y < 0.0 {
                (horizon, ground, (-dir.y).min(1.0))
            } else {
                (horizon, zenith, dir.y.min(1.0))
            };
            let from: Vector4<f32> = from.into();
            let to: Vector4<f32> = to.into();
            (from + (to - from) * t).into()
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn texel(&self, face: CubeFace, x: usize, y: usize) -> Vector4<f32> {
        self.faces[face as usize][y * self.size + x].into()
    }

    /// Bilinear sample along `dir`, clamped at the face edges.
    pub fn sample(&self, dir: Vector3<f32>) -> Vector4<f32> {
        self.sample_with(dir, TextureFilter::Bilinear)
    }

    /// Samples along `dir` with `filter`. Cube faces always clamp.
    pub fn sample_with(&self, dir: Vector3<f32>, filter: TextureFilter) -> Vector4<f32> {
        let (face, uv) = CubeFace::project(dir);
        let size = self.size as f32;
        let last = size - 1.0;

        if filter == TextureFilter::Nearest {
            let x = (uv.x * size).floor().clamp(0.0, last) as usize;
            let y = (uv.y * size).floor().clamp(0.0, last) as usize;
            return self.texel(face, x, y);
        }

        let fx = (uv.x * size - 0.5).clamp(0.0, last);
        let fy = (uv.y * size - 0.5).clamp(0.0, last);
        let (x0, y0) = (fx.floor() as usize, fy.floor() as usize);
        let (x1, y1) = ((x0 + 1).min(self.size - 1), (y0 + 1).min(self.size - 1));

        bilinear(
            self.texel(face, x0, y0),
            self.texel(face, x1, y0),
            self.texel(face, x0, y1),
            self.texel(face, x1, y1),
            fx - x0 as f32,
            fy - y0 as f32,
        )
    }
}

fn bilinear(
    c00: Vector4<f32>,
    c10: Vector4<f32>,
    c01: Vector4<f32>,
    c11: Vector4<f32>,
    tx: f32,
    ty: f32,
) -> Vector4<f32> {
    let top = c00 + (c10 - c00) * tx;
    let bottom = c01 + (c11 - c01) * tx;
    top + (bottom - top) * ty
}
