//! End-to-end flow: search the catalog, rank, scale and record in the ledger.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use kalori::catalog;
use kalori::ledger::{DailyTotal, Ledger, NewEntry};
use kalori::nutrition::{self, Unit};
use kalori::ranking;
use tempfile::tempdir;
use time::macros::date;

const SEARCH_FIXTURE: &str = r#"{
    "count": 2,
    "products": [
        {
            "id": "111",
            "product_name": "Oatmeal Cookies",
            "nutriments": {"energy-kcal_100g": 450, "proteins_100g": 6}
        },
        {
            "id": "222",
            "product_name": "Oatmeal",
            "serving_size": "50 g",
            "nutriments": {"energy-kcal_100g": 375, "proteins_100g": 13.5}
        }
    ]
}"#;

fn serve_once(body: &str) -> String {
    let response = format!("HTTP/1.0 200 OK\r\n\r\n{body}");
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 2048];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{}", addr)
}

#[test]
fn oatmeal_scenario_from_search_to_daily_total() {
    let base = url::Url::parse(&serve_once(SEARCH_FIXTURE)).unwrap();
    let mut products = catalog::search(&base, "oatmeal").unwrap();
    ranking::rank("oatmeal", &mut products);

    // The exact name match outranks the longer partial match.
    assert_eq!(products[0].display_name(), "Oatmeal");

    let facts = nutrition::scale_for_grams(&products[0].nutriments, 50.0);
    assert_eq!(facts.calories, 187.5);
    assert_eq!(facts.protein, 6.75);

    let dir = tempdir().unwrap();
    let ledger = Ledger::open(dir.path().join("kalori.db")).unwrap();
    let today = date!(2026 - 08 - 24);
    ledger
        .record(
            &NewEntry {
                product_id: products[0].id.clone(),
                name: products[0].display_name().to_string(),
                grams: 50.0,
                calories: facts.calories,
                protein: facts.protein,
            },
            today,
        )
        .unwrap();

    let total = ledger.daily_totals(today).unwrap();
    assert!(total.calories >= 187.5);
    assert!(total.protein >= 6.75);
}

#[test]
fn serving_quantities_accumulate_across_entries() {
    let dir = tempdir().unwrap();
    let ledger = Ledger::open(dir.path().join("kalori.db")).unwrap();
    let today = date!(2026 - 08 - 24);
    let yesterday = date!(2026 - 08 - 23);

    // Two servings of a "50 g" product is 100 grams.
    let grams = nutrition::quantity_in_grams(Unit::Servings, 2.0, Some("50 g")).unwrap();
    assert_eq!(grams, 100.0);

    for (day, calories, protein) in [(today, 375.0, 13.5), (yesterday, 120.0, 4.0)] {
        ledger
            .record(
                &NewEntry {
                    product_id: "222".into(),
                    name: "Oatmeal".into(),
                    grams,
                    calories,
                    protein,
                },
                day,
            )
            .unwrap();
    }

    // Totals cover exactly the queried day.
    assert_eq!(
        ledger.daily_totals(today).unwrap(),
        DailyTotal {
            calories: 375.0,
            protein: 13.5
        }
    );
    assert_eq!(
        ledger.daily_totals(yesterday).unwrap(),
        DailyTotal {
            calories: 120.0,
            protein: 4.0
        }
    );
}
