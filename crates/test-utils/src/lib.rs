//! Marquee test utilities.
//!
//! Fixture builders and seeding helpers for database-backed catalog tests.
//! Every fixture id carries a caller-chosen prefix so parallel tests can seed
//! and clean up their own rows without touching anyone else's.

use sqlx::PgPool;

/// Create a test movie with no year, director, rating or credits.
pub fn test_movie(id: &str, title: &str) -> TestMovie {
    TestMovie {
        id: id.to_string(),
        title: title.to_string(),
        year: None,
        director: None,
        rating: None,
        stars: Vec::new(),
        genres: Vec::new(),
    }
}

/// Create a test star.
pub fn test_star(id: &str, name: &str) -> TestStar {
    TestStar {
        id: id.to_string(),
        name: name.to_string(),
        birth_year: None,
    }
}

/// A test movie builder for creating catalog fixtures.
#[derive(Debug, Clone)]
pub struct TestMovie {
    pub id: String,
    pub title: String,
    pub year: Option<i32>,
    pub director: Option<String>,
    /// `(rating, vote_count)`; unrated movies are left out of paged searches.
    pub rating: Option<(f64, i32)>,
    pub stars: Vec<TestStar>,
    pub genres: Vec<String>,
}

impl TestMovie {
    /// Set the release year.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Set the director.
    pub fn with_director(mut self, director: &str) -> Self {
        self.director = Some(director.to_string());
        self
    }

    /// Give the movie a ratings row.
    pub fn rated(mut self, rating: f64, vote_count: i32) -> Self {
        self.rating = Some((rating, vote_count));
        self
    }

    /// Credit a star.
    pub fn with_star(mut self, star: TestStar) -> Self {
        self.stars.push(star);
        self
    }

    /// Tag with a genre, created on demand by name.
    pub fn with_genre(mut self, name: &str) -> Self {
        self.genres.push(name.to_string());
        self
    }
}

/// A test star.
#[derive(Debug, Clone)]
pub struct TestStar {
    pub id: String,
    pub name: String,
    pub birth_year: Option<i32>,
}

impl TestStar {
    /// Set the birth year.
    pub fn born(mut self, year: i32) -> Self {
        self.birth_year = Some(year);
        self
    }
}

/// Insert movies with their ratings, stars and genres.
///
/// Stars and genres that already exist are reused.
pub async fn seed(pool: &PgPool, movies: &[TestMovie]) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    for movie in movies {
        sqlx::query("INSERT INTO movies (id, title, year, director) VALUES ($1, $2, $3, $4)")
            .bind(&movie.id)
            .bind(&movie.title)
            .bind(movie.year)
            .bind(&movie.director)
            .execute(&mut *tx)
            .await?;

        if let Some((rating, vote_count)) = movie.rating {
            sqlx::query("INSERT INTO ratings (movie_id, rating, vote_count) VALUES ($1, $2, $3)")
                .bind(&movie.id)
                .bind(rating)
                .bind(vote_count)
                .execute(&mut *tx)
                .await?;
        }

        for star in &movie.stars {
            sqlx::query(
                "INSERT INTO stars (id, name, birth_year) VALUES ($1, $2, $3) \
                 ON CONFLICT (id) DO NOTHING",
            )
            .bind(&star.id)
            .bind(&star.name)
            .bind(star.birth_year)
            .execute(&mut *tx)
            .await?;

            sqlx::query("INSERT INTO stars_in_movies (star_id, movie_id) VALUES ($1, $2)")
                .bind(&star.id)
                .bind(&movie.id)
                .execute(&mut *tx)
                .await?;
        }

        for genre in &movie.genres {
            let genre_id: i32 = sqlx::query_scalar(
                "INSERT INTO genres (name) VALUES ($1) \
                 ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
                 RETURNING id",
            )
            .bind(genre)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query("INSERT INTO genres_in_movies (genre_id, movie_id) VALUES ($1, $2)")
                .bind(genre_id)
                .bind(&movie.id)
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await
}

/// Delete every movie and star whose id starts with `prefix`.
///
/// Genres are shared between tests and left in place.
pub async fn cleanup(pool: &PgPool, prefix: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM movies WHERE starts_with(id, $1)")
        .bind(prefix)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM stars WHERE starts_with(id, $1)")
        .bind(prefix)
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_credits() {
        let movie = test_movie("tt_x_1", "Alien")
            .with_year(1979)
            .with_director("Ridley Scott")
            .rated(8.5, 900_000)
            .with_star(test_star("nm_x_1", "Sigourney Weaver").born(1949))
            .with_genre("Horror")
            .with_genre("Sci-Fi");

        assert_eq!(movie.year, Some(1979));
        assert_eq!(movie.rating, Some((8.5, 900_000)));
        assert_eq!(movie.stars[0].birth_year, Some(1949));
        assert_eq!(movie.genres, vec!["Horror", "Sci-Fi"]);
    }

    #[test]
    fn bare_movie_is_unrated() {
        let movie = test_movie("tt_x_2", "Untitled");
        assert!(movie.rating.is_none());
        assert!(movie.stars.is_empty());
    }
}
