use searchtree::RbTreeMap;

fn main() {
    let mut map = RbTreeMap::new();
    for key in [5, 3, 8, 1, 4, 7, 9] {
        map.insert(key, key * 10);
    }

    println!("Forward:");
    let mut cursor = map.cursor();
    while cursor.move_next() {
        if let Some((k, v)) = cursor.key_value() {
            println!("Key: {}, Value: {}", k, v);
        }
    }

    println!("Backward:");
    cursor.end();
    while cursor.move_prev() {
        if let Some((k, v)) = cursor.key_value() {
            println!("Key: {}, Value: {}", k, v);
        }
    }

    let mut cursor = map.cursor_mut();
    while cursor.move_next() {
        if let Some(v) = cursor.value_mut() {
            *v += 1;
        }
    }
    println!("Incremented: {:?}", map);
}
