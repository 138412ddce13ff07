pub mod activity;
pub mod amount;
pub mod blog;
pub mod booking;
pub mod hotel;
pub mod testimonial;
pub mod user;

pub use activity::{Activity, ActivityDraft};
pub use amount::Amount;
pub use blog::{Blog, BlogCategory, BlogCategoryDraft, BlogDraft};
pub use booking::{Booking, BookingDetails, BookingId, BookingStatus, BookingType};
pub use hotel::{Hotel, HotelDraft};
pub use testimonial::{Testimonial, TestimonialDraft};

/// Records addressed by an opaque upstream identifier.
pub trait Identified {
    fn id(&self) -> &str;
}

/// Facet type for records that expose no categorical filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoFacet {}
