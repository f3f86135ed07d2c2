use searchtree::{AvlTreeMap, BsTreeMap, RbTreeMap, TreeMap};

fn main() {
    let mut map = AvlTreeMap::new();
    map.insert(0, "zero");
    map.insert(1, "one");
    map.insert(2, "two");
    map.insert(2, "two");
    map.insert(3, "three");
    map.insert(4, "four");
    map.insert(5, "five");
    assert_eq!(map.get(&1), Some(&"one"));
    map.remove(&1);
    assert!(map.get(&1).is_none());

    for (k, v) in &map {
        println!("{k} => {v}");
    }
    println!("avl height: {}", map.height());

    let mut rb = RbTreeMap::with_cmp(|a: &&str, b: &&str| a.len().cmp(&b.len()).then(a.cmp(b)));
    for word in ["pear", "fig", "banana", "kiwi"] {
        rb.insert(word, word.len());
    }
    println!("by length: {:?}", rb);

    let bst: BsTreeMap<_, _> = (0..5).map(|x| (x, x * x)).collect();
    println!("bst: {:?}", bst);

    let mut tree_map = TreeMap::new();
    for x in 0..5 {
        tree_map.insert(x, x.to_string());
    }
    tree_map.for_each_mut(|_, v| {
        v.push('!');
        true
    });
    print!("{{ ");
    for entry in tree_map.enumerate() {
        print!("{}: {}, ", entry.key, entry.value);
    }
    println!("}}");
}
