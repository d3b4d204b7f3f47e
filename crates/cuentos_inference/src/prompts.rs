//! Spanish prompt templates and the stages built from them.
//!
//! Placeholders use `{name}`; every placeholder of a template is a required
//! input of the stage built from it.

use cuentos_core::SamplingOptions;

use crate::stage::PromptStage;

pub const SUMMARY: &str = "Basándote en la siguiente información, crea un resumen en 60 palabras, fácil de entender para un niño de entre 6 a 12 años.
El resumen debe ser claro y educativo. Asegúrate de cumplir estos aspectos en el resumen:

1. Usa lenguaje sencillo que los niños puedan entender.
2. Explica el tema de una manera que un niño pueda visualizar lo que está pasando.
3. Destaca por qué este tema es importante.
4. Incluye un dato interesante para que los niños puedan entender mejor el tema, a manera de SABIAS QUE... solo una vez.
5. Evita repetir información innecesaria y asegúrate de que el resumen sea directo, sin complicar demasiado los hechos.

Información:
{text}

Resumen educativo para niños:
";

pub const MAP: &str = "Proporciona un resumen claro y sencillo del siguiente fragmento de texto. Asegúrate de:
1. Extraer los datos más importantes sobre el contenido.
2. No omitir ninguna información relevante sobre el contenido.

Texto a resumir:
{text}

Resumen claro y conciso:
";

pub const COMBINE: &str = "Basándote en la siguiente información, crea un resumen fácil de entender para un niño de entre 6-12 años.
El resumen debe ser claro y educativo. Asegúrate de seguir estas instrucciones:

1. Usa lenguaje sencillo que los niños puedan entender.
2. Explica el tema de una manera que un niño pueda visualizar lo que está pasando, usando ejemplos o comparaciones sencillas si es necesario.
3. Destaca por qué este tema es importante.
4. Incluye un dato interesante o algo que los niños puedan hacer para ayudar o entender mejor el tema.
5. Evita repetir información innecesaria y asegúrate de que el resumen sea directo, sin complicar demasiado los hechos.

Información:
{text}

Resumen educativo para niños:
";

pub const VILLAINS: &str = "Eres un generador de villanos para cuentos infantiles enfocados en ecología, adecuados para niños de entre 6 y 12 años, y no debes generarles pesadillas.

Dado el siguiente resumen:

{resumen}

Genera cinco posibles villanos causantes del problema descrito en el contexto.

IMPORTANTE: La respuesta debes darla UNICAMENTE con cinco posibles nombres de personajes causantes del problema, siguiendo la estructura:

1) **Nombre del Personaje 1**: (Habilidades del personaje en relación con la causa del problema)
2) **Nombre del Personaje 2**: (Habilidades del personaje en relación con la causa del problema, diferentes a las de Personaje 1)
3) **Nombre del Personaje 3**: (Habilidades del personaje en relación con la causa del problema, diferentes a las de Personajes 1 y 2)
4) **Nombre del Personaje 4**: (Habilidades del personaje en relación con la causa del problema, diferentes a las de Personajes 1, 2 y 3)
5) **Nombre del Personaje 5**: (Habilidades del personaje en relación con la causa del problema, diferentes a las de Personajes 1, 2, 3 y 4)

Recuerda que los personajes deben ser apropiados para niños y no causarles miedo.

Respuesta:
";

pub const HEROES: &str = "Eres un generador de héroes para cuentos infantiles enfocados en ecología, adecuados para niños de entre 6 y 12 años.

Dado el siguiente resumen del problema:

{resumen}

Y el villano seleccionado:

{villano}

Genera cinco posibles héroes que podrían enfrentar al villano. Cada héroe debe tener habilidades únicas, relacionadas con la causa del problema. Sigue la estructura:

1) **Nombre del Héroe 1**: (Habilidades del héroe en relación con el villano y la causa del problema)
2) **Nombre del Héroe 2**: (Habilidades del héroe en relación con el villano y la causa del problema, diferentes a las de Héroe 1)
3) **Nombre del Héroe 3**: (Habilidades del héroe en relación con el villano y la causa del problema, diferentes a las de Héroes 1 y 2)
4) **Nombre del Héroe 4**: (Habilidades del héroe en relación con el villano y la causa del problema, diferentes a las de Héroes 1, 2 y 3)
5) **Nombre del Héroe 5**: (Habilidades del héroe en relación con el villano y la causa del problema, diferentes a las de Héroes 1, 2, 3 y 4)

Recuerda que los héroes deben ser apropiados para niños y describelos en 20 palabras o menos.

Respuesta:
";

pub const STORY: &str = "Genera una historia corta sobre esta información:
'{resumen}'
La historia debe contar con las siguientes especificaciones:
    1. La historia debe tener como personaje principal: {heroe}
    2. La historia debe tener como villano: {villano}
    3. Divide la historia en 5 escenas principales.
    4. Cada escena debe ser un párrafo corto pero muy descriptivo y visual.
    5. La historia completa debe tener al menos 10 párrafos detallados.
    6. Evita temas sensibles o contenido para adultos.
    7. Asegúrate de que el personaje principal esté presente en cada escena.
    8. Mantén la consistencia en personajes y crea los escenarios que consideres para la historia y elementos de la trama en todas las escenas.
    9. La historia debe tener un comienzo claro, desarrollo y conclusión.
Formato de salida:
La RESPUESTA debe ser únicamente la historia completa:
[Historia completa aquí, con al menos 10 párrafos]

Historia:
";

pub const ILLUSTRATED_STORY: &str = "Genera una historia corta en español sobre '{theme}' con las siguientes especificaciones:
1. La historia debe tener un personaje principal claramente definido y personajes secundarios.
2. Divide la historia en 5 escenas principales.
3. Cada escena debe ser un párrafo corto pero muy descriptivo y visual.
4. La historia completa debe tener al menos 10 párrafos detallados.
5. Evita temas sensibles o contenido para adultos.
6. Asegúrate de que el personaje principal esté presente en cada escena.
7. Mantén la consistencia en personajes, escenarios y elementos de la trama en todas las escenas.
8. La historia debe tener un comienzo claro, desarrollo y conclusión.

Formato de salida:
Historia completa:
[Historia completa aquí, con al menos 10 párrafos]

Escenas:
1. [Primera escena aquí]
2. [Segunda escena aquí]
...
5. [Quinta escena aquí]
";

pub const CHARACTERS_AND_SETTINGS: &str = "Basándote en la siguiente historia, proporciona una lista de personajes principales y secundarios, y una lista de escenarios y elementos clave de la trama:

{story}

Formato de salida:
Personajes:
- Personaje 1
- Personaje 2
...

Escenarios y elementos clave:
- Escenario/Elemento 1
- Escenario/Elemento 2
...
";

pub const ENHANCE_SCENE: &str = "Mejora esta escena para generar una imagen coherente con el tema '{theme}', enfocándote en detalles visuales y ambientales vívidos.
La descripción debe ser muy detallada y específica, incluyendo:
- Descripción del entorno (colores, texturas, iluminación)
- Posición y acción de los personajes
- Expresiones faciales y lenguaje corporal
- Objetos o elementos importantes en la escena
- Atmósfera general y estado de ánimo

Mantén la descripción breve (máximo 100 palabras) y muy visual. Asegúrate de incluir al personaje principal y los personajes secundarios relevantes: {characters}
Mantén la consistencia con los siguientes escenarios y elementos: {settings}

Escena original: '{scene}'

Proporciona la descripción mejorada en formato de párrafo único, sin viñetas ni numeración.
";

pub const TRANSLATE: &str =
    "Traduce el siguiente texto al {language}, manteniendo su estructura y formato:\n\n{text}";

/// Appended to every image prompt.
pub const STYLE: &str = "Estilo: Ilustración detallada y realista. Incluye los personajes y escenarios en cada escena según corresponda. Mantén una paleta de colores y técnica artística coherentes. Tamaño de imagen: 1280x720 píxeles.";

/// Output cap of the illustration tool's text calls.
const ILLUSTRATION_MAX_NEW_TOKENS: u32 = 512;

fn illustration_sampling() -> SamplingOptions {
    SamplingOptions::creative().with_max_new_tokens(Some(ILLUSTRATION_MAX_NEW_TOKENS))
}

pub fn summary_stage() -> PromptStage {
    PromptStage::new("summary", SUMMARY, SamplingOptions::deterministic())
}

pub fn map_stage() -> PromptStage {
    PromptStage::new(
        "summary-map",
        MAP,
        SamplingOptions::deterministic().with_max_new_tokens(None),
    )
}

pub fn combine_stage() -> PromptStage {
    PromptStage::new(
        "summary-reduce",
        COMBINE,
        SamplingOptions::deterministic().with_max_new_tokens(None),
    )
}

pub fn villains_stage() -> PromptStage {
    PromptStage::new("villains", VILLAINS, SamplingOptions::creative())
}

pub fn heroes_stage() -> PromptStage {
    PromptStage::new("heroes", HEROES, SamplingOptions::creative())
}

pub fn story_stage() -> PromptStage {
    PromptStage::new("story", STORY, SamplingOptions::long_form())
}

pub fn illustrated_story_stage() -> PromptStage {
    PromptStage::new("illustrated-story", ILLUSTRATED_STORY, illustration_sampling())
}

pub fn characters_stage() -> PromptStage {
    PromptStage::new("characters", CHARACTERS_AND_SETTINGS, illustration_sampling())
}

pub fn enhance_stage() -> PromptStage {
    PromptStage::new("enhance-scene", ENHANCE_SCENE, illustration_sampling())
}

pub fn translate_stage() -> PromptStage {
    PromptStage::new("translate", TRANSLATE, illustration_sampling())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_required_inputs() {
        assert_eq!(summary_stage().required_inputs(), ["text"]);
        assert_eq!(villains_stage().required_inputs(), ["resumen"]);
        assert_eq!(heroes_stage().required_inputs(), ["resumen", "villano"]);
        assert_eq!(story_stage().required_inputs(), ["resumen", "heroe", "villano"]);
        assert_eq!(
            enhance_stage().required_inputs(),
            ["theme", "characters", "settings", "scene"]
        );
    }

    #[test]
    fn test_stage_sampling_bias() {
        assert!(summary_stage().sampling().temperature < villains_stage().sampling().temperature);
        assert_eq!(summary_stage().sampling().max_new_tokens, Some(50));
        assert_eq!(story_stage().sampling().max_new_tokens, Some(1024));
        assert_eq!(heroes_stage().sampling().top_p, 0.9);
    }
}
