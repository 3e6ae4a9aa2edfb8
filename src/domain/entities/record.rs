//! Type-erased wrapper used to stage entities in storage.

use super::{Amenity, City, Place, State, User};

/// Entity type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    State,
    City,
    User,
    Amenity,
    Place,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::State,
        EntityKind::City,
        EntityKind::User,
        EntityKind::Amenity,
        EntityKind::Place,
    ];

    /// Class name used in serialized objects and log output.
    pub fn class_name(self) -> &'static str {
        match self {
            EntityKind::State => "State",
            EntityKind::City => "City",
            EntityKind::User => "User",
            EntityKind::Amenity => "Amenity",
            EntityKind::Place => "Place",
        }
    }
}

/// Any storable entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    State(State),
    City(City),
    User(User),
    Amenity(Amenity),
    Place(Place),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::State(_) => EntityKind::State,
            Record::City(_) => EntityKind::City,
            Record::User(_) => EntityKind::User,
            Record::Amenity(_) => EntityKind::Amenity,
            Record::Place(_) => EntityKind::Place,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Record::State(s) => &s.id,
            Record::City(c) => &c.id,
            Record::User(u) => &u.id,
            Record::Amenity(a) => &a.id,
            Record::Place(p) => &p.id,
        }
    }
}

impl From<State> for Record {
    fn from(v: State) -> Self {
        Record::State(v)
    }
}

impl From<City> for Record {
    fn from(v: City) -> Self {
        Record::City(v)
    }
}

impl From<User> for Record {
    fn from(v: User) -> Self {
        Record::User(v)
    }
}

impl From<Amenity> for Record {
    fn from(v: Amenity) -> Self {
        Record::Amenity(v)
    }
}

impl From<Place> for Record {
    fn from(v: Place) -> Self {
        Record::Place(v)
    }
}
