//! `Reflect` implementations for standard Rust types.
//!
//! Leaf types map to a scalar kind, smart pointers and `Option` to
//! `Indirect`, collections to `Seq`/`Map`, trait objects to `Dynamic`.
//! Functions and channels are reflected as `Unsupported` so that records
//! holding them still derive and simply skip those fields.

use std::any::Any;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, SyncSender};
use std::time::SystemTime;

use chrono::{DateTime, FixedOffset, Local, Utc};
use num_complex::Complex;

use crate::reflect::{Kind, Mapping, Reflect, Sequence, Shape, ValueRef};

/// Boilerplate shared by every impl in this module.
macro_rules! reflect_common {
    () => {
        fn dyn_shape(&self) -> Shape {
            <Self as Reflect>::shape()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    };
}

// --- Scalars ---

macro_rules! impl_reflect_scalar {
    ($kind:ident, $variant:ident, |$v:ident| $conv:expr; $($t:ty),* $(,)?) => {
        $(
            impl Reflect for $t {
                fn shape() -> Shape {
                    Shape::of::<Self>(Kind::$kind)
                }

                fn reflect(&self) -> ValueRef<'_> {
                    let $v = self;
                    ValueRef::$variant($conv)
                }

                reflect_common!();
            }
        )*
    };
}

impl_reflect_scalar!(Bool, Bool, |v| *v; bool);
impl_reflect_scalar!(Int, Int, |v| i128::from(*v); i8, i16, i32, i64, i128);
impl_reflect_scalar!(Uint, Uint, |v| u128::from(*v); u8, u16, u32, u64, u128);
impl_reflect_scalar!(Float32, Float32, |v| *v; f32);
impl_reflect_scalar!(Float64, Float64, |v| *v; f64);
impl_reflect_scalar!(Complex64, Complex64, |v| *v; Complex<f32>);
impl_reflect_scalar!(Complex128, Complex128, |v| *v; Complex<f64>);
impl_reflect_scalar!(Str, Char, |v| *v; char);
impl_reflect_scalar!(Str, Str, |v| &**v; String, &'static str, Box<str>, Arc<str>, Cow<'static, str>);

impl Reflect for isize {
    fn shape() -> Shape {
        Shape::of::<Self>(Kind::Int)
    }

    fn reflect(&self) -> ValueRef<'_> {
        ValueRef::Int(*self as i128)
    }

    reflect_common!();
}

impl Reflect for usize {
    fn shape() -> Shape {
        Shape::of::<Self>(Kind::Uint)
    }

    fn reflect(&self) -> ValueRef<'_> {
        ValueRef::Uint(*self as u128)
    }

    reflect_common!();
}

// --- Time ---

impl_reflect_scalar!(Time, Time, |v| v.fixed_offset(); DateTime<Utc>, DateTime<Local>, DateTime<FixedOffset>);

impl Reflect for SystemTime {
    fn shape() -> Shape {
        Shape::of::<Self>(Kind::Time)
    }

    fn reflect(&self) -> ValueRef<'_> {
        ValueRef::Time(DateTime::<Utc>::from(*self).fixed_offset())
    }

    reflect_common!();
}

// --- Optionality and pointers ---

impl<T: Reflect> Reflect for Option<T> {
    fn shape() -> Shape {
        Shape::of::<Self>(Kind::Indirect(T::shape))
    }

    fn reflect(&self) -> ValueRef<'_> {
        match self {
            Some(inner) => ValueRef::Indirect(inner),
            None => ValueRef::Null,
        }
    }

    reflect_common!();
}

macro_rules! impl_reflect_pointer {
    ($($ptr:ident),*) => {
        $(
            impl<T: Reflect> Reflect for $ptr<T> {
                fn shape() -> Shape {
                    Shape::of::<Self>(Kind::Indirect(T::shape))
                }

                fn reflect(&self) -> ValueRef<'_> {
                    ValueRef::Indirect(&**self)
                }

                reflect_common!();
            }
        )*
    };
}

impl_reflect_pointer!(Box, Arc, Rc);

// --- Trait objects ---

macro_rules! impl_reflect_dynamic {
    ($($t:ty),*) => {
        $(
            impl Reflect for $t {
                fn shape() -> Shape {
                    Shape::of::<Self>(Kind::Dynamic)
                }

                fn reflect(&self) -> ValueRef<'_> {
                    ValueRef::Dynamic(Some(&**self))
                }

                reflect_common!();
            }
        )*
    };
}

impl_reflect_dynamic!(
    Box<dyn Reflect>,
    Box<dyn Reflect + Send + Sync>,
    Arc<dyn Reflect + Send + Sync>
);

// --- Sequences ---

macro_rules! impl_reflect_sequence {
    ($($coll:ident),*) => {
        $(
            impl<T: Reflect> Sequence for $coll<T> {
                fn len(&self) -> usize {
                    $coll::len(self)
                }

                fn items(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
                    Box::new(self.iter().map(|item| item as &dyn Reflect))
                }
            }

            impl<T: Reflect> Reflect for $coll<T> {
                fn shape() -> Shape {
                    Shape::of::<Self>(Kind::Seq(T::shape))
                }

                fn reflect(&self) -> ValueRef<'_> {
                    ValueRef::Seq(self)
                }

                reflect_common!();
            }
        )*
    };
}

impl_reflect_sequence!(Vec, VecDeque, LinkedList, BTreeSet);

impl<T: Reflect, S: 'static> Sequence for HashSet<T, S> {
    fn len(&self) -> usize {
        HashSet::len(self)
    }

    fn items(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
        Box::new(self.iter().map(|item| item as &dyn Reflect))
    }
}

impl<T: Reflect, S: 'static> Reflect for HashSet<T, S> {
    fn shape() -> Shape {
        Shape::of::<Self>(Kind::Seq(T::shape))
    }

    fn reflect(&self) -> ValueRef<'_> {
        ValueRef::Seq(self)
    }

    reflect_common!();
}

impl<T: Reflect, const N: usize> Sequence for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn items(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
        Box::new(self.iter().map(|item| item as &dyn Reflect))
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn shape() -> Shape {
        Shape::of::<Self>(Kind::Seq(T::shape))
    }

    fn reflect(&self) -> ValueRef<'_> {
        ValueRef::Seq(self)
    }

    reflect_common!();
}

impl<T: Reflect> Sequence for Box<[T]> {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn items(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
        Box::new(self.iter().map(|item| item as &dyn Reflect))
    }
}

impl<T: Reflect> Reflect for Box<[T]> {
    fn shape() -> Shape {
        Shape::of::<Self>(Kind::Seq(T::shape))
    }

    fn reflect(&self) -> ValueRef<'_> {
        ValueRef::Seq(self)
    }

    reflect_common!();
}

// --- Maps ---

impl<K: Reflect, V: Reflect, S: 'static> Mapping for HashMap<K, V, S> {
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
        Box::new(
            self.iter()
                .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)),
        )
    }
}

impl<K: Reflect, V: Reflect, S: 'static> Reflect for HashMap<K, V, S> {
    fn shape() -> Shape {
        Shape::of::<Self>(Kind::Map {
            key: K::shape,
            value: V::shape,
        })
    }

    fn reflect(&self) -> ValueRef<'_> {
        ValueRef::Map(self)
    }

    reflect_common!();
}

impl<K: Reflect, V: Reflect> Mapping for BTreeMap<K, V> {
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
        Box::new(
            self.iter()
                .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)),
        )
    }
}

impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::of::<Self>(Kind::Map {
            key: K::shape,
            value: V::shape,
        })
    }

    fn reflect(&self) -> ValueRef<'_> {
        ValueRef::Map(self)
    }

    reflect_common!();
}

// --- Unsupported ---

macro_rules! impl_reflect_unsupported {
    ($(<$($g:ident),*> $t:ty),* $(,)?) => {
        $(
            impl<$($g: 'static),*> Reflect for $t {
                fn shape() -> Shape {
                    Shape::of::<Self>(Kind::Unsupported)
                }

                fn reflect(&self) -> ValueRef<'_> {
                    ValueRef::Opaque
                }

                reflect_common!();
            }
        )*
    };
}

impl_reflect_unsupported!(
    <> (),
    <T> PhantomData<T>,
    <R> fn() -> R,
    <A, R> fn(A) -> R,
    <A, B, R> fn(A, B) -> R,
    <T> Sender<T>,
    <T> SyncSender<T>,
    <T> Receiver<T>,
);
