use crmaddr::{embed_url_for_coordinate, search_url_for_address, AddressExtractor};

fn main() {
    env_logger::init();

    let extractor = AddressExtractor::new();

    println!("=== CRM address extraction demo ===\n");

    let test_cases = vec![
        // full addresses
        "123 Main St, Springfield, IL 62704, USA",
        "1600 Pennsylvania Avenue NW, Washington, DC 20500-0003",
        "290 Bremner Blvd, Toronto, ON M5V 3L9, Canada",
        "10 Downing Street, London SW1A 2AA, UK",
        "Hauptstraße 5, 10115 Berlin, Germany",
        // one line per part
        "Acme Corp\n123 Main St\nSpringfield; IL 62704",
        // partial
        "Springfield IL 62704",
        "742 Evergreen Terrace",
        // coordinates
        "embedded note 40.7128,-74.0060 rest of text",
        "Selected address: 1600 Amphitheatre Parkway, Mountain View, CA 94043, USA, latitude: 37.4220, longitude: -122.0841",
        // unrecognized
        "call back after lunch",
        "",
    ];

    for text in test_cases {
        let result = extractor.extract(text);
        println!("input: {text:?}");
        for field in crmaddr::AddressField::ALL {
            println!("  {:<12} {}", field.label(), result.get(field).unwrap_or("-"));
        }
        println!("  remainder    {:?}", result.remainder());
        match result.coordinate() {
            Some(c) => {
                println!("  coordinate   {c}");
                println!("  map          {}", embed_url_for_coordinate(&c));
            }
            None => println!("  coordinate   -"),
        }
        let query = result.to_query_string();
        println!("  query        {query:?}");
        if !query.is_empty() {
            println!("  search       {}", search_url_for_address(&query));
        }
        println!();
    }
}
