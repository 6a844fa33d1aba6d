//! Static reply texts and the Go release table.

/// Greeting for `/start`.
pub const START_TEXT: &str = r#"Assalomu alaykum! GoferUz Golang botiga xush kelibsiz 👋

Bu bot Go dasturlash tili bo'yicha ma'lumotlar va resurslarni taqdim etish uchun yaratilgan.

Mavjud buyruqlar ro'yxatini ko'rish uchun /help buyrug'ini yuboring.
O'zbekistondagi Go dasturchilar hamjamiyati haqida ma'lumot olish uchun /group buyrug'ini yuboring."#;

pub const HELP_TEXT: &str = r#"Mavjud komandalar ro'yxati:

/help - ushbu xabarni qayta ko'rsatish
/rules - qoidalarni aks ettirish
/about - ushbu botimizning rivojlantirish qismi
/group - Go ga oid guruh va hamjamiyatlar
/roadmap - boshlang'ich o'rganuvchilar uchun
/useful - Go haqida foydali yoki kerakli ma'lumotlar
/latest - eng oxirgi reliz haqida qisqacha ma'lumot
/version - biron anniq reliz haqida to'liq ma'lumot
/warn - mavzudan chetlashganga ogohlantiruv"#;

/// Community rules for `/rules`.
pub const RULES_TEXT: &str = r#"GoferUz hamjamiyati qoidalari:

1. Hurmat bilan munosabatda bo'ling - boshqa a'zolarga nisbatan doimo hurmat va e'tibor ko'rsating
2. Spam yoki reklama tarqatmang - ruxsatsiz reklama materiallarini jo'natmang
3. Siyosiy va diniy mavzulardan chetlaning - guruh faqat Go dasturlash tili uchun
4. Go dasturlash tili bo'yicha savollarda aniq va foydali bo'ling
5. Maqsadimiz - O'zbekistonda Go dasturlash tilini rivojlantirish va Go jamoasini kengaytirish

Qoidalarga rioya qilmaslik ogohlantirishga, takrorlanishi esa guruhdan chetlashtirishga sabab bo'lishi mumkin."#;

/// Shown for `/about` and the `about` button.
pub const ABOUT_TEXT: &str = concat!(
    "Bu bot Rust dasturlash tilida yaratilgan va Go dasturlash tiliga bag'ishlangan.
Botning asosiy maqsadi - Go o'rganuvchilar uchun foydali ma'lumotlarni tezkor taqdim etish va
O'zbekistondagi Go hamjamiyatini qo'llab-quvvatlash.

Bot arxitekturasi:
- bot - botni ishga tushirish va to'xtatish
- transport - webhook va polling rejimlari
- dispatcher - kiruvchi yangilanishlarni yo'naltirish
- commands - buyruqlar va ularning matnlari
- config - konfiguratsiya fayli va muhit o'zgaruvchilari

Botning joriy versiyasi: ",
    env!("CARGO_PKG_VERSION"),
    "
Muallif: haywan

Go - bu Google tomonidan yaratilgan, yuqori samaradorlikka ega, statik tipli va
kompilyatsiya qilinadigan zamonaviy dasturlash tili. Go dasturlari juda tezkor
ishlaydi, parallel dasturlashni osonlashtiradi va xotiradan samarali foydalanadi."
);

/// Go communities, local and international.
pub const GROUP_TEXT: &str = r#"Go dasturlash tili bo'yicha guruhlar va hamjamiyatlar:

🌍 O'zbekiston hamjamiyati:
- Telegram: @goferuz - O'zbekistondagi Go dasturchilar guruhi
- Veb-sayt: https://gopher.uz - O'zbekistonlik gopher'lar uchun portal

🌐 Xalqaro hamjamiyatlar:
- GitHub: https://github.com/goferuz - O'zbek Go dasturlari repozitoriyalari
- Forum: https://forum.golangbridge.org/ - Go dasturchilar forumi
- Reddit: https://www.reddit.com/r/golang/ - Go haqidagi Reddit jamiyati
- Slack: https://gophers.slack.com/ - Go dasturchilar uchun Slack kanali
- Discord: https://discord.gg/golang - Go dasturchilarning Discord serveri
- Stack Overflow: https://stackoverflow.com/questions/tagged/go - Go savollari bazasi

Ushbu hamjamiyatlarga qo'shilish orqali siz Go bo'yicha bilimlaringizni oshirish 
va tajribali dasturchilar bilan muloqot qilish imkoniyatiga ega bo'lasiz."#;

/// Learning roadmap; also sent for the `roadmap` button.
pub const ROADMAP_TEXT: &str = r#"Go dasturlash tilini o'rganish uchun mukammal yo'l xaritasi:

1️⃣ Go asoslari - o'zgaruvchilar, turlari va funksiyalar
   - O'zgaruvchilar va konstantalar deklaratsiyasi (var, const)
   - Asosiy ma'lumot turlari (int, float64, bool, string, rune)
   - Funksiyalar, qaytarish qiymatlari va ko'p qaytarishlar

2️⃣ Ma'lumot tuzilmalari
   - Massivlar (o'zgarmas o'lcham) va slayslar (dinamik o'lcham)
   - Map (xaritalar) - kalit/qiymat juftliklari bilan ishlash
   - Strukturalar (struct) va ularning usullari (methods)

3️⃣ Dastur oqimi boshqaruvi
   - If/else shartli ifodalar
   - For looplarining turli ko'rinishlari
   - Switch va select ifodalar

4️⃣ Paralel dasturlash asoslari
   - Goroutine - Go'ning engil vazn thread'lari
   - Kanallar (channel) orqali ma'lumot almashish
   - Sync paketi va mutex yordamida sinxronizatsiya

5️⃣ Interfeys va xatolar bilan ishlash
   - Interfeys tushunchasi va duck typing
   - Xatolarni qayta ishlash metodologiyasi
   - defer, panic va recover mexanizmlari

6️⃣ Testlash va sifat ta'minoti
   - Go texnologiyasida yozilgan unit testlar
   - Benchmark test'lar orqali samaradorlikni baholash
   - Table-driven test usuli

7️⃣ Paketlar va modullar tizimi
   - Go module tizimi va go.mod fayli
   - Paket strukturasi va importlar
   - Eksport (bosh harf) va shaxsiy (kichik harf) identifikatorlar

8️⃣ Ilg'or mavzular
   - Reflection mexanizmi bilan ishlash
   - CGO - C kodini Go bilan integratsiyalash
   - Context paketi va uni qo'llash usullari

9️⃣ Amaliy loyihalar
   - CLI (buyruq qatori) dasturlari yaratish
   - Web xizmatlar va HTTP server (net/http)
   - Ma'lumotlar bazasi bilan ishlash (SQL va NoSQL)

Boshlash uchun eng yaxshi resurs: https://go.dev/learn/"#;

pub const USEFUL_TEXT: &str = r#"Go dasturlash tili bo'yicha eng foydali manbalar:

📚 Asosiy manbalar:
- Rasmiy veb-sayt: https://go.dev - barcha rasmiy hujjatlar va yangiliklar
- Tour of Go: https://tour.golang.org/ - interaktiv o'rganish qo'llanmasi
- Go by Example: https://gobyexample.com/ - misollarda Go'ni o'rganish
- Effektiv Go: https://go.dev/doc/effective_go - samarali kod yozish bo'yicha tavsiyalar
- Standard Library: https://pkg.go.dev/std - standart kutubxonalar hujjatlari
- Go Playground: https://play.golang.org/ - brauzerda kod yozish va sinab ko'rish
- Go hamjamiyati blogi: https://go.dev/blog/ - yangiliklar va chuqurlashtirilgan maqolalar

🔍 Qo'shimcha foydali manbalar:
- Awesome Go: https://github.com/avelino/awesome-go - Go kutubxonalari va vositalar to'plami
- Go Design Patterns: https://github.com/tmrts/go-patterns - Go uchun dizayn patternlar
- Go Forums: https://forum.golangbridge.org/ - savol-javoblar va muhokamalar

📖 Tavsiya etiladigan kitoblar:
- "The Go Programming Language" - Alan Donovan va Brian Kernighan
- "Go in Action" - William Kennedy
- "Concurrency in Go" - Katherine Cox-Buday

🎓 Video darslar:
- Golang bo'yicha o'zbek tilidagi darslar: https://youtube.com/playlist?list=PLLIX7niqDict7oqNQesQQT9b3GlqF7JAj"#;

/// Summary of the newest Go release.
pub const LATEST_TEXT: &str = r#"Go 1.22.1 (2024-yil 5-mart) versiyasidagi asosiy yangiliklar:

🔧 Muhim xatolar tuzatildi:
- net/http paketidagi xavfsizlik bilan bog'liq muammolar bartaraf etildi
- crypto paketlaridagi xatolar tuzatildi

🚀 Yaxshilanishlar:
- Kompilyator ishlash tezligi oshirildi
- Runtime samaradorligi yaxshilandi
- Xotiradan foydalanish optimallashtirildi

🔒 Xavfsizlik yangiliklari:
- Standart kutubxonalardagi potensial zaifliklar bartaraf etildi

Batafsil ma'lumot: https://go.dev/doc/devel/release#go1.22.1"#;

pub const UNKNOWN_COMMAND_TEXT: &str =
    "Noma'lum buyruq. Mavjud buyruqlar ro'yxatini ko'rish uchun /help buyrug'ini ishlatib ko'ring";

pub const UNKNOWN_CALLBACK_TEXT: &str =
    "Noma'lum tugma bosildi. Iltimos qaytadan urinib ko'ring.";

pub const VERSION_USAGE_TEXT: &str =
    "Iltimos, ma'lumot olmoqchi bo'lgan versiya raqamini kiriting. Masalan: /version 1.22.0";

const RELEASE_NOTES_URL: &str = "https://go.dev/doc/devel/release#go";

/// Known releases, oldest first.
const VERSIONS: &[(&str, &str)] = &[
    (
        "1.21.0",
        "Go 1.21.0 (2023-yil 8-avgust):\n\n\
         🆕 Yangi imkoniyatlar:\n\
         - min() va max() o'rnatilgan funksiyalar qo'shildi\n\
         - Loop o'zgaruvchilari semantikasi o'zgartirildi (har bir iteratsiya uchun yangi o'zgaruvchi)\n\
         - slog paketi orqali strukturaviy log yozish imkoniyati qo'shildi\n\n\
         🔧 Yaxshilanishlar:\n\
         - Forward compatible method chaqirishlari\n\
         - PGO (Profile-guided optimization) orqali dastur ishlash tezligini oshirish",
    ),
    (
        "1.22.0",
        "Go 1.22.0 (2024-yil 6-fevral):\n\n\
         🆕 Yangi imkoniyatlar:\n\
         - Butun sonlar ustida iteratsiya qilish uchun yangi range sintaksisi (range 10)\n\
         - HTTP router pattern matching qo'llab-quvvatlash bilan yaxshilandi\n\
         - For loop'larda xatoliklarni qayta ishlash takomillashtirildi\n\n\
         🔄 Muhim o'zgarishlar:\n\
         - Orqaga moslik yanada kuchaytirildi\n\
         - Xatolik xabarlari tushunarliroq bo'ldi\n\
         - Paket importi optimallashtirildi",
    ),
    (
        "1.22.1",
        "Go 1.22.1 (2024-yil 5-mart):\n\n\
         🔧 Xatoliklar tuzatishlari:\n\
         - net/http paketidagi HTTP sarlavhalarni qayta ishlashdagi xatolar tuzatildi\n\
         - crypto/tls paketidagi sertifikat tekshirishda optimizatsiyalar qilindi\n\
         - reflect paketidagi xotira sizishlar bartaraf etildi\n\n\
         🚀 Yaxshilanishlar:\n\
         - Paralel garbage collection algoritmi takomillashtirildi\n\
         - GOEXPERIMENT=rangefunc bayroq orqali yangi range funksiyalarini sinash imkoniyati qo'shildi",
    ),
];

/// Release notes for `version` with a link to the official notes appended.
pub fn version_text(version: &str) -> String {
    let version = version.trim();
    if version.is_empty() {
        return VERSION_USAGE_TEXT.to_string();
    }

    match VERSIONS.iter().find(|(key, _)| *key == version) {
        Some((_, notes)) => format!(
            "{}\n\nRasmiy hujjatlar va batafsilroq ma'lumot: {}{}",
            notes,
            RELEASE_NOTES_URL,
            version.replace('.', "")
        ),
        None => {
            let known: Vec<&str> = VERSIONS.iter().map(|(key, _)| *key).collect();
            format!(
                "Kechirasiz, {} versiyasi haqida ma'lumot bazamizda topilmadi. Mavjud versiyalar: {}",
                version,
                known.join(", ")
            )
        }
    }
}

/// Reminder aimed at the sender; users without a handle get a generic address.
pub fn warn_text(username: Option<&str>) -> String {
    let username = username.filter(|u| !u.is_empty()).unwrap_or("Foydalanuvchi");
    format!(
        "⚠️ Diqqat @{}! Iltimos, guruh qoidalariga rioya qiling va mavzudan chetlashmang. \
         Qoidalar bilan tanishish uchun /rules buyrug'ini yuboring.",
        username
    )
}

/// Greeting posted in the group when someone joins.
pub fn welcome_text(mention: &str) -> String {
    format!(
        "Assalomu alaykum {}! Bizni hamjamiyat haqida ko'proq bilish uchun botga murojaat qiling.",
        mention
    )
}

pub const WELCOME_BUTTON_TEXT: &str = "Botga tashrif buyirish";
