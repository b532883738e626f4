//! Structural equality and assignability between resolved descriptors.
//!
//! Assignability is intentionally lenient in one direction: a consumer that asks for a raw type
//! (no arguments) accepts any instantiation, and non-wildcard arguments are compared with the
//! same assignability relation rather than strict invariance.

use crate::descriptor::{RawType, TypeDescriptor, WildcardBound};
use crate::facade::GenericResolver;
use crate::name::well_known;

impl GenericResolver<'_> {
    /// Can a value typed `producer` be used where `consumer` is expected?
    pub fn is_assignable(&self, consumer: &TypeDescriptor, producer: &TypeDescriptor) -> bool {
        if consumer.is_unbounded_object() || consumer.is_unbounded_wildcard() {
            return true;
        }

        // A wildcard in consumer position behaves like a single argument slot.
        if consumer.is_wildcard() {
            return self.argument_matches(consumer, producer);
        }

        let producer = match producer.wildcard_bound() {
            WildcardBound::None => producer.clone(),
            WildcardBound::Upper => producer.without_wildcard(),
            WildcardBound::Lower => TypeDescriptor::object(),
        };
        let box_producer =
            self.config().boxing && producer.is_primitive() && !consumer.is_primitive();
        let producer = if box_producer {
            producer.boxed()
        } else {
            producer
        };

        if !self.is_base_assignable(consumer.base(), producer.base()) {
            return false;
        }
        if consumer.arguments().is_empty() {
            return true;
        }

        if consumer.is_array() {
            return match (consumer.component(), producer.component()) {
                (Some(c), Some(p)) => self.is_assignable(&c, &p),
                _ => false,
            };
        }

        let Some(consumer_class) = consumer.base().as_class() else {
            return false;
        };
        // Re-derive the producer's arguments as seen through the consumer's class. This also
        // covers the same-class case, where raw producers pick up defaulted arguments.
        let producer_args = match self.hierarchy(&producer) {
            Ok(hierarchy) => match hierarchy.get(consumer_class.as_str()) {
                // Undeclared classes are opaque leaves with no parameter slots.
                Some(subst)
                    if subst.params().is_empty() && producer.base() == consumer.base() =>
                {
                    producer.arguments().to_vec()
                }
                Some(subst) => subst.arguments(),
                None => return false,
            },
            Err(err) => {
                tracing::debug!(
                    target: "nova.generics",
                    error = %err,
                    producer = %producer,
                    "failed to build producer hierarchy for assignability check"
                );
                return false;
            }
        };

        consumer.arguments().len() == producer_args.len()
            && consumer
                .arguments()
                .iter()
                .zip(&producer_args)
                .all(|(c, p)| self.argument_matches(c, p))
    }

    /// Structural equality, boxing-equivalent at the leaf.
    pub fn is_same(&self, a: &TypeDescriptor, b: &TypeDescriptor) -> bool {
        if a.wildcard_bound() != b.wildcard_bound() {
            return false;
        }
        let same_base = a.base() == b.base()
            || (self.config().boxing && a.base().boxed() == b.base().boxed());
        same_base
            && a.arguments().len() == b.arguments().len()
            && a
                .arguments()
                .iter()
                .zip(b.arguments())
                .all(|(x, y)| self.is_same(x, y))
    }

    fn argument_matches(&self, consumer: &TypeDescriptor, producer: &TypeDescriptor) -> bool {
        match consumer.wildcard_bound() {
            WildcardBound::Upper => {
                let bound = consumer.without_wildcard();
                match producer.wildcard_bound() {
                    // `? super X` only promises Object on reads.
                    WildcardBound::Lower => bound.is_unbounded_object(),
                    _ => self.is_assignable(&bound, &producer.without_wildcard()),
                }
            }
            WildcardBound::Lower => {
                let bound = consumer.without_wildcard();
                match producer.wildcard_bound() {
                    WildcardBound::Upper => false,
                    _ => self.is_assignable(&producer.without_wildcard(), &bound),
                }
            }
            WildcardBound::None => {
                if producer.is_wildcard() {
                    consumer.is_unbounded_object()
                } else {
                    self.is_assignable(consumer, producer)
                }
            }
        }
    }

    fn is_base_assignable(&self, consumer: &RawType, producer: &RawType) -> bool {
        if consumer == producer {
            return true;
        }
        let boxing = self.config().boxing;
        if boxing && consumer.boxed() == producer.boxed() {
            return true;
        }

        match (consumer, producer) {
            (RawType::Primitive(_), _) => false,
            (_, RawType::Primitive(_)) => {
                boxing && self.is_base_assignable(consumer, &producer.boxed())
            }
            (RawType::Class(c), _) if c.is_object() => true,
            (RawType::Array(c), RawType::Array(p)) => {
                if c.is_primitive() || p.is_primitive() {
                    c == p
                } else {
                    self.is_base_assignable(c, p)
                }
            }
            (RawType::Array(_), RawType::Class(_)) => false,
            (RawType::Class(c), RawType::Array(_)) => {
                c.as_str() == well_known::CLONEABLE || c.as_str() == well_known::SERIALIZABLE
            }
            (RawType::Class(c), RawType::Class(_)) => {
                match self.hierarchy(&TypeDescriptor::raw(producer.clone())) {
                    Ok(hierarchy) => hierarchy.contains(c.as_str()),
                    Err(_) => false,
                }
            }
        }
    }
}
