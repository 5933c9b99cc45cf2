//! Concurrent writers racing on the same movie version.

use marquee_core::error::ErrorKind;
use marquee_db::models::movie::CreateMovie;
use marquee_db::repositories::MovieRepo;
use sqlx::PgPool;

const WRITERS: usize = 8;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_exactly_one_concurrent_update_wins(pool: PgPool) {
    let created = MovieRepo::create(
        &pool,
        &CreateMovie {
            title: "Rashomon".into(),
            year: 1950,
            runtime: 88,
            genres: vec!["drama".into(), "mystery".into()],
        },
    )
    .await
    .unwrap();

    let mut handles = Vec::with_capacity(WRITERS);
    for writer in 0..WRITERS {
        let pool = pool.clone();
        let mut edit = created.clone();
        edit.title = format!("Rashomon (take {writer})");
        handles.push(tokio::spawn(async move {
            MovieRepo::update(&pool, &edit).await
        }));
    }

    let mut winners = Vec::new();
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(movie) => winners.push(movie),
            Err(err) => {
                assert_eq!(err.kind(), ErrorKind::EditConflict, "{err}");
                conflicts += 1;
            }
        }
    }

    assert_eq!(winners.len(), 1);
    assert_eq!(conflicts, WRITERS - 1);
    assert_eq!(winners[0].version, created.version + 1);

    let stored = MovieRepo::get(&pool, created.id).await.unwrap();
    assert_eq!(stored, winners[0]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_retry_after_conflict_succeeds_with_fresh_version(pool: PgPool) {
    let created = MovieRepo::create(
        &pool,
        &CreateMovie {
            title: "Ran".into(),
            year: 1985,
            runtime: 162,
            genres: vec!["drama".into()],
        },
    )
    .await
    .unwrap();

    MovieRepo::update(&pool, &created).await.unwrap();

    let mut stale = created.clone();
    stale.runtime = 160;
    let err = MovieRepo::update(&pool, &stale).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EditConflict);

    let mut fresh = MovieRepo::get(&pool, created.id).await.unwrap();
    fresh.runtime = 160;
    let updated = MovieRepo::update(&pool, &fresh).await.unwrap();
    assert_eq!(updated.version, 3);
    assert_eq!(updated.runtime, 160);
}
