mod film;

pub use film::{FilmRepository, SqliteFilmRepository};
